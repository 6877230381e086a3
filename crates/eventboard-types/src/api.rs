use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::{Event, EventDetail, Question, User};

// -- JWT Claims --

/// Bearer token claims. Only the user id is carried; everything else is
/// looked up when needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub iat: usize,
    pub exp: usize,
}

// -- Envelope --

/// Success wrapper shared by every endpoint. The payload keys differ per
/// endpoint and are flattened next to `success` and `error`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            error: None,
            payload,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    pub status: u16,
}

// -- Auth --

// Request fields are optional so that a missing field is reported as a
// validation failure rather than a deserialization rejection.

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: User,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub user: User,
}

// -- Events --

/// Body of both create and update; the full field set is required either way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub close_registration: Option<String>,
    pub max_attendees: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventCreatedResponse {
    pub message: String,
    pub event_id: Uuid,
    pub event: Event,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventUpdatedResponse {
    pub message: String,
    pub event: Event,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventListResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventDetailResponse {
    pub event: EventDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// -- Engagement --

#[derive(Debug, Default, Deserialize)]
pub struct AttendRequest {
    #[serde(default, deserialize_with = "id_text")]
    pub event_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AskQuestionRequest {
    #[serde(default, deserialize_with = "id_text")]
    pub event_id: Option<String>,
    #[serde(alias = "text")]
    pub question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionCreatedResponse {
    pub message: String,
    pub question: Question,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuestionsQuery {
    pub event_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionListResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VoteRequest {
    #[serde(default, deserialize_with = "id_text")]
    pub question_id: Option<String>,
}

/// Body ids stay as text until the handler resolves them. A bare number is
/// read as its digits so it resolves like any other unknown id.
fn id_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(n) => n.to_string(),
    }))
}
