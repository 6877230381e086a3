//! Database row types. These map directly to SQLite rows and stay distinct
//! from the eventboard-types wire models; conversions live here.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use eventboard_types::models::{Event, Question, QuestionView, User};

pub struct UserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub session_token: Option<String>,
    pub created_at: String,
}

impl UserRow {
    /// Public projection without hash, salt or session token.
    pub fn into_user(self) -> Result<User> {
        Ok(User {
            user_id: parse_id(&self.id, "users.id")?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        })
    }
}

pub struct NewUser<'a> {
    pub id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub salt: &'a str,
}

pub struct EventRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub start_date: String,
    pub close_registration: String,
    pub max_attendees: i64,
    pub creator_id: String,
    pub created_at: String,
}

impl EventRow {
    pub fn into_event(self) -> Result<Event> {
        Ok(Event {
            event_id: parse_id(&self.id, "events.id")?,
            creator_id: parse_id(&self.creator_id, "events.creator_id")?,
            created_at: parse_timestamp(&self.created_at)?,
            name: self.name,
            description: self.description,
            location: self.location,
            start_date: self.start_date,
            close_registration: self.close_registration,
            max_attendees: self.max_attendees,
        })
    }
}

/// Validated event fields, shared by insert and the owner-conditional update.
pub struct EventFieldsRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub start_date: &'a str,
    pub close_registration: &'a str,
    pub max_attendees: i64,
}

pub struct QuestionRow {
    pub id: String,
    pub event_id: String,
    pub asked_by: String,
    pub question: String,
    pub votes: i64,
    pub created_at: String,
}

impl QuestionRow {
    pub fn into_question(self) -> Result<Question> {
        Ok(Question {
            question_id: parse_id(&self.id, "questions.id")?,
            event_id: parse_id(&self.event_id, "questions.event_id")?,
            asked_by: parse_id(&self.asked_by, "questions.asked_by")?,
            created_at: parse_timestamp(&self.created_at)?,
            question: self.question,
            votes: self.votes,
        })
    }
}

/// Everything the event detail page needs, read under a single lock.
pub struct EventDetailRow {
    pub event: EventRow,
    pub attendee_count: i64,
    pub is_joined: bool,
    /// Each question with whether the requester has voted on it.
    pub questions: Vec<(QuestionRow, bool)>,
}

impl EventDetailRow {
    pub fn into_detail(self) -> Result<eventboard_types::models::EventDetail> {
        let questions = self
            .questions
            .into_iter()
            .map(|(row, user_voted)| {
                Ok(QuestionView {
                    question: row.into_question()?,
                    user_voted,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(eventboard_types::models::EventDetail {
            event: self.event.into_event()?,
            attendee_count: self.attendee_count,
            is_joined: self.is_joined,
            questions,
        })
    }
}

// -- Write outcomes --

/// Result of an insert guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    Created,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendOutcome {
    Joined,
    EventMissing,
    AlreadyAttending,
}

pub enum QuestionInsert {
    Created(QuestionRow),
    EventMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded,
    QuestionMissing,
    AlreadyVoted,
}

fn parse_id(raw: &str, column: &str) -> Result<Uuid> {
    raw.parse()
        .with_context(|| format!("Corrupt {} '{}'", column, raw))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written with datetime('now') have no timezone; they are UTC.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .with_context(|| format!("Corrupt timestamp '{}'", raw))
}
