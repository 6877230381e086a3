use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use eventboard_types::api::{
    AskQuestionRequest, AttendRequest, Claims, Envelope, MessageResponse, QuestionCreatedResponse,
    QuestionListResponse, QuestionsQuery, VoteRequest,
};

use crate::auth::AppState;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::ledger;
use crate::run_blocking;

/// POST /api/events/attend
pub async fn attend_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<AttendRequest>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    run_blocking(move || ledger::attend(&db.db, req.event_id, claims.id)).await?;

    Ok(Json(Envelope::ok(MessageResponse::new("Joined event successfully."))))
}

/// POST /api/events/question
pub async fn ask_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<AskQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    let question =
        run_blocking(move || ledger::ask_question(&db.db, req.event_id, claims.id, req.question))
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(QuestionCreatedResponse {
            message: "Question added successfully.".to_string(),
            question,
        })),
    ))
}

/// GET /api/events/questions?event_id=
pub async fn list_questions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<QuestionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    let questions =
        run_blocking(move || ledger::list_questions(&db.db, query.event_id.as_deref())).await?;

    Ok(Json(Envelope::ok(QuestionListResponse { questions })))
}

/// POST /api/events/vote
pub async fn vote(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<VoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    let question_id = req.question_id.clone().unwrap_or_default();
    run_blocking(move || ledger::vote(&db.db, req.question_id, claims.id)).await?;

    info!("User {} voted on question {}", claims.id, question_id.trim());
    Ok(Json(Envelope::ok(MessageResponse::new("Vote recorded successfully."))))
}
