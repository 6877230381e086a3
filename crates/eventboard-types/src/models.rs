use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public projection of a user. Password hash, salt and session token
/// never leave the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub start_date: String,
    pub close_registration: String,
    /// Advisory only; attendance is not capped against it.
    pub max_attendees: i64,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: Uuid,
    pub event_id: Uuid,
    pub asked_by: Uuid,
    pub question: String,
    pub votes: i64,
    pub created_at: DateTime<Utc>,
}

/// A question as seen by a particular requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    #[serde(flatten)]
    pub question: Question,
    pub user_voted: bool,
}

/// Event plus the aggregates and requester-specific flags shown on the
/// detail page. Without a known requester `is_joined` and every
/// `user_voted` are false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub attendee_count: i64,
    pub is_joined: bool,
    pub questions: Vec<QuestionView>,
}
