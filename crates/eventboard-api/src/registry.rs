//! Event Registry: event CRUD with creator-only mutation.

use uuid::Uuid;

use eventboard_db::Database;
use eventboard_db::models::{EventFieldsRow, EventRow};
use eventboard_types::api::EventFields;
use eventboard_types::models::{Event, EventDetail};

use crate::error::AppError;
use crate::id_key;

const FIELDS_REQUIRED: &str = "All fields are required.";
const EVENT_NOT_FOUND: &str = "Event not found.";

/// Create and update both demand the full field set. `max_attendees` must
/// be positive.
pub fn validate_fields(fields: &EventFields) -> Result<EventFieldsRow<'_>, AppError> {
    fn text(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    match (
        text(&fields.name),
        text(&fields.description),
        text(&fields.location),
        text(&fields.start_date),
        text(&fields.close_registration),
        fields.max_attendees.filter(|n| *n > 0),
    ) {
        (
            Some(name),
            Some(description),
            Some(location),
            Some(start_date),
            Some(close_registration),
            Some(max_attendees),
        ) => Ok(EventFieldsRow {
            name,
            description,
            location,
            start_date,
            close_registration,
            max_attendees,
        }),
        _ => Err(AppError::validation(FIELDS_REQUIRED)),
    }
}

fn into_events(rows: Vec<EventRow>) -> Result<Vec<Event>, AppError> {
    rows.into_iter()
        .map(|row| row.into_event().map_err(AppError::from))
        .collect()
}

pub fn create_event(db: &Database, creator_id: Uuid, fields: &EventFields) -> Result<Event, AppError> {
    let fields = validate_fields(fields)?;
    let row = db.insert_event(&Uuid::new_v4().to_string(), &creator_id.to_string(), &fields)?;
    Ok(row.into_event()?)
}

pub fn list_owned_by(db: &Database, user_id: Uuid) -> Result<Vec<Event>, AppError> {
    into_events(db.list_events_by_creator(&user_id.to_string())?)
}

pub fn list_all(db: &Database) -> Result<Vec<Event>, AppError> {
    into_events(db.list_all_events()?)
}

/// Event plus attendee count, questions and the requester's flags. The
/// event lookup short-circuits before anything else is read.
pub fn get_detail(db: &Database, id: &str, requester: Option<Uuid>) -> Result<EventDetail, AppError> {
    let key = id_key(id).ok_or_else(|| AppError::not_found(EVENT_NOT_FOUND))?;
    let requester = requester.map(|r| r.to_string());

    let detail = db
        .get_event_detail(&key, requester.as_deref())?
        .ok_or_else(|| AppError::not_found(EVENT_NOT_FOUND))?;
    Ok(detail.into_detail()?)
}

pub fn update_event(
    db: &Database,
    id: &str,
    requester: Uuid,
    fields: &EventFields,
) -> Result<Event, AppError> {
    let fields = validate_fields(fields)?;
    let key = id_key(id).ok_or(AppError::NotFoundOrForbidden)?;

    let row = db
        .update_event_owned(&key, &requester.to_string(), &fields)?
        .ok_or(AppError::NotFoundOrForbidden)?;
    Ok(row.into_event()?)
}

pub fn delete_event(db: &Database, id: &str, requester: Uuid) -> Result<(), AppError> {
    let key = id_key(id).ok_or(AppError::NotFoundOrForbidden)?;

    if db.delete_event_owned(&key, &requester.to_string())? {
        Ok(())
    } else {
        Err(AppError::NotFoundOrForbidden)
    }
}
