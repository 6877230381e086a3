#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use eventboard_api::auth::{AppState, AppStateInner};
use eventboard_api::routes::router;
use eventboard_api::token::TokenService;
use eventboard_db::Database;
use eventboard_db::models::NewUser;

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let state: AppState = Arc::new(AppStateInner {
            db: Database::open_in_memory().expect("Failed to open test db"),
            tokens: TokenService::new(TEST_SECRET),
        });
        let router = router(state.clone());
        Self { router, state }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    /// Register through the API and log in; returns (user_id, token).
    pub async fn sign_up(&self, email: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/user/register",
                None,
                Some(serde_json::json!({
                    "first_name": "Test",
                    "last_name": "User",
                    "email": email,
                    "password": "hunter22",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let (status, body) = self
            .send(
                Method::POST,
                "/api/user/login",
                None,
                Some(serde_json::json!({ "email": email, "password": "hunter22" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        (
            body["user"]["user_id"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    /// Insert a user straight into the store and mint a token, skipping
    /// password hashing. Returns (user_id, token).
    pub fn seed_user(&self, email: &str) -> (String, String) {
        let user_id = Uuid::new_v4();
        let id = user_id.to_string();
        self.state
            .db
            .create_user(&NewUser {
                id: &id,
                first_name: "Seeded",
                last_name: "User",
                email,
                password_hash: "unused",
                salt: "unused",
            })
            .unwrap();
        let token = self.state.tokens.issue(user_id).unwrap();
        (id, token)
    }

    pub async fn create_event(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .send(Method::POST, "/api/events", Some(token), Some(event_body(name)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create event failed: {}", body);
        body["event_id"].as_str().unwrap().to_string()
    }
}

pub fn event_body(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "description": "Talks, questions and snacks",
        "location": "Community hall",
        "start_date": "2026-12-05T18:30:00Z",
        "close_registration": "2026-12-01T23:59:00Z",
        "max_attendees": 60,
    })
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
