//! Engagement Ledger: attendance, questions and votes.

use uuid::Uuid;

use eventboard_db::Database;
use eventboard_db::models::{AttendOutcome, QuestionInsert, VoteOutcome};
use eventboard_types::models::Question;

use crate::auth::present;
use crate::error::AppError;
use crate::id_key;

const EVENT_NOT_FOUND: &str = "Event not found.";
const QUESTION_NOT_FOUND: &str = "Question not found.";

/// An id that is present but unparsable names nothing, so it is reported
/// the same way as a well-formed id with no row behind it.
fn resolve(raw: String, not_found: &str) -> Result<String, AppError> {
    id_key(&raw).ok_or_else(|| AppError::not_found(not_found))
}

pub fn attend(db: &Database, event_id: Option<String>, user_id: Uuid) -> Result<(), AppError> {
    let raw = present(event_id).ok_or_else(|| AppError::validation("event_id is required."))?;
    let event_id = resolve(raw, EVENT_NOT_FOUND)?;

    match db.attend_event(&event_id, &user_id.to_string())? {
        AttendOutcome::Joined => Ok(()),
        AttendOutcome::EventMissing => Err(AppError::not_found(EVENT_NOT_FOUND)),
        AttendOutcome::AlreadyAttending => {
            Err(AppError::conflict("You are already attending this event."))
        }
    }
}

pub fn ask_question(
    db: &Database,
    event_id: Option<String>,
    asked_by: Uuid,
    text: Option<String>,
) -> Result<Question, AppError> {
    let (Some(raw), Some(text)) = (present(event_id), present(text)) else {
        return Err(AppError::validation("event_id and question are required."));
    };
    let event_id = resolve(raw, EVENT_NOT_FOUND)?;

    let inserted = db.insert_question(
        &Uuid::new_v4().to_string(),
        &event_id,
        &asked_by.to_string(),
        text.trim(),
    )?;
    match inserted {
        QuestionInsert::Created(row) => Ok(row.into_question()?),
        QuestionInsert::EventMissing => Err(AppError::not_found(EVENT_NOT_FOUND)),
    }
}

/// Questions for an event, most voted first. An unknown event, including
/// one named by a malformed id, simply has none.
pub fn list_questions(db: &Database, event_id: Option<&str>) -> Result<Vec<Question>, AppError> {
    let raw = event_id
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation("event_id is required."))?;
    let Some(event_id) = id_key(raw) else {
        return Ok(Vec::new());
    };

    db.list_questions(&event_id)?
        .into_iter()
        .map(|row| row.into_question().map_err(AppError::from))
        .collect()
}

pub fn vote(db: &Database, question_id: Option<String>, voter_id: Uuid) -> Result<(), AppError> {
    let raw = present(question_id).ok_or_else(|| AppError::validation("question_id is required."))?;
    let question_id = resolve(raw, QUESTION_NOT_FOUND)?;

    match db.record_vote(&question_id, &voter_id.to_string())? {
        VoteOutcome::Recorded => Ok(()),
        VoteOutcome::QuestionMissing => Err(AppError::not_found(QUESTION_NOT_FOUND)),
        VoteOutcome::AlreadyVoted => {
            Err(AppError::conflict("You have already voted for this question."))
        }
    }
}
