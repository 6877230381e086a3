mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn attendance_is_per_user_and_once() {
    let app = TestApp::new();
    let (_, a) = app.seed_user("a@x.com");
    let (_, b) = app.seed_user("b@x.com");
    let event_id = app.create_event(&a, "Open day").await;
    let uri = format!("/api/events/{}", event_id);

    let (status, body) = app
        .send(Method::POST, "/api/events/attend", Some(&b), Some(json!({ "event_id": event_id })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = app
        .send(Method::POST, "/api/events/attend", Some(&b), Some(json!({ "event_id": event_id })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You are already attending this event.");

    let (_, as_b) = app.send(Method::GET, &uri, Some(&b), None).await;
    assert_eq!(as_b["event"]["is_joined"], true);
    assert_eq!(as_b["event"]["attendee_count"], 1);

    let (_, as_a) = app.send(Method::GET, &uri, Some(&a), None).await;
    assert_eq!(as_a["event"]["is_joined"], false);
    assert_eq!(as_a["event"]["attendee_count"], 1);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/events/attend",
            Some(&b),
            Some(json!({ "event_id": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found.");
}

#[tokio::test]
async fn ask_and_vote() {
    let app = TestApp::new();
    let (_, a) = app.seed_user("a@x.com");
    let (b_id, b) = app.seed_user("b@x.com");
    let event_id = app.create_event(&a, "AMA").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/events/question",
            Some(&b),
            Some(json!({ "event_id": event_id, "question": "What's next?" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["question"]["votes"], 0);
    assert_eq!(body["question"]["asked_by"], b_id.as_str());
    let question_id = body["question"]["question_id"].as_str().unwrap().to_string();

    let vote = json!({ "question_id": question_id });
    let (status, body) = app
        .send(Method::POST, "/api/events/vote", Some(&b), Some(vote.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vote recorded successfully.");

    let (status, body) = app.send(Method::POST, "/api/events/vote", Some(&b), Some(vote)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You have already voted for this question.");

    let list_uri = format!("/api/events/questions?event_id={}", event_id);
    let (status, body) = app.send(Method::GET, &list_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"][0]["votes"], 1);

    let detail_uri = format!("/api/events/{}", event_id);
    let (_, as_b) = app.send(Method::GET, &detail_uri, Some(&b), None).await;
    assert_eq!(as_b["event"]["questions"][0]["user_voted"], true);
    assert_eq!(as_b["event"]["questions"][0]["votes"], 1);

    let (_, as_a) = app.send(Method::GET, &detail_uri, Some(&a), None).await;
    assert_eq!(as_a["event"]["questions"][0]["user_voted"], false);
}

#[tokio::test]
async fn question_validation() {
    let app = TestApp::new();
    let (_, a) = app.seed_user("a@x.com");
    let event_id = app.create_event(&a, "AMA").await;

    let (status, _) = app
        .send(Method::POST, "/api/events/question", Some(&a), Some(json!({ "event_id": event_id })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/events/question",
            Some(&a),
            Some(json!({ "event_id": Uuid::new_v4(), "text": "Anyone?" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found.");

    let (status, body) = app.send(Method::GET, "/api/events/questions", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "event_id is required.");

    let (status, _) = app
        .send(Method::POST, "/api/events/question", None, Some(json!({ "event_id": event_id, "question": "?" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn vote_on_missing_question() {
    let app = TestApp::new();
    let (_, a) = app.seed_user("a@x.com");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/events/vote",
            Some(&a),
            Some(json!({ "question_id": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Question not found.");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_voters_are_all_counted() {
    const VOTERS: usize = 12;

    let app = TestApp::new();
    let (_, owner) = app.seed_user("owner@x.com");
    let event_id = app.create_event(&owner, "Popular talk").await;

    let (_, body) = app
        .send(
            Method::POST,
            "/api/events/question",
            Some(&owner),
            Some(json!({ "event_id": event_id, "question": "Slides?" })),
        )
        .await;
    let question_id = body["question"]["question_id"].as_str().unwrap().to_string();

    let tokens: Vec<String> = (0..VOTERS)
        .map(|i| app.seed_user(&format!("voter{}@x.com", i)).1)
        .collect();

    let app = std::sync::Arc::new(app);
    let mut handles = Vec::new();
    for token in tokens {
        let app = app.clone();
        let question_id = question_id.clone();
        handles.push(tokio::spawn(async move {
            let vote = json!({ "question_id": question_id });
            // Same voter twice in parallel; exactly one may win.
            let (first, second) = tokio::join!(
                app.send(Method::POST, "/api/events/vote", Some(&token), Some(vote.clone())),
                app.send(Method::POST, "/api/events/vote", Some(&token), Some(vote.clone())),
            );
            let mut statuses = [first.0, second.0];
            statuses.sort();
            statuses
        }));
    }

    for handle in handles {
        let statuses = handle.await.unwrap();
        assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);
    }

    let (_, body) = app
        .send(Method::GET, &format!("/api/events/questions?event_id={}", event_id), None, None)
        .await;
    assert_eq!(body["questions"][0]["votes"], VOTERS as i64);
}

#[tokio::test]
async fn malformed_ids_resolve_as_unknown() {
    let app = TestApp::new();
    let (_, a) = app.seed_user("a@x.com");
    let event_id = app.create_event(&a, "AMA").await;

    let (status, body) = app
        .send(Method::POST, "/api/events/attend", Some(&a), Some(json!({ "event_id": "42" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Event not found.");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/events/question",
            Some(&a),
            Some(json!({ "event_id": "nope", "question": "Anyone?" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found.");

    let (status, body) = app
        .send(Method::POST, "/api/events/vote", Some(&a), Some(json!({ "question_id": 7 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Question not found.");

    let (status, body) = app
        .send(Method::POST, "/api/events/vote", Some(&a), Some(json!({ "question_id": null })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "question_id is required.");

    let (status, body) = app.send(Method::GET, "/api/events/questions?event_id=42", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"], json!([]));

    let (_, as_a) = app.send(Method::GET, &format!("/api/events/{}", event_id), Some(&a), None).await;
    assert_eq!(as_a["event"]["attendee_count"], 0);
    assert_eq!(as_a["event"]["questions"], json!([]));
}
