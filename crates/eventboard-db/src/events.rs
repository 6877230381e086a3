use anyhow::Result;
use rusqlite::{Connection, Row};

use crate::Database;
use crate::models::{EventDetailRow, EventFieldsRow, EventRow, QuestionRow};
use crate::queries::OptionalExt;

const EVENT_COLUMNS: &str = "id, name, description, location, start_date, close_registration, \
                             max_attendees, creator_id, created_at";

impl Database {
    pub fn insert_event(
        &self,
        id: &str,
        creator_id: &str,
        fields: &EventFieldsRow<'_>,
    ) -> Result<EventRow> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO events (id, name, description, location, start_date,
                                         close_registration, max_attendees, creator_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     RETURNING {}",
                    EVENT_COLUMNS
                ),
                rusqlite::params![
                    id,
                    fields.name,
                    fields.description,
                    fields.location,
                    fields.start_date,
                    fields.close_registration,
                    fields.max_attendees,
                    creator_id
                ],
                map_event,
            )?;
            Ok(row)
        })
    }

    pub fn get_event(&self, id: &str) -> Result<Option<EventRow>> {
        self.with_conn(|conn| query_event(conn, id))
    }

    pub fn list_events_by_creator(&self, creator_id: &str) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM events WHERE creator_id = ?1 ORDER BY created_at, rowid",
                EVENT_COLUMNS
            ))?;
            let rows = stmt
                .query_map([creator_id], map_event)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_all_events(&self) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM events ORDER BY created_at, rowid",
                EVENT_COLUMNS
            ))?;
            let rows = stmt
                .query_map([], map_event)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Single conditional UPDATE. `None` when no row matched both the id
    /// and the creator, which covers both a missing event and a foreign one.
    pub fn update_event_owned(
        &self,
        id: &str,
        creator_id: &str,
        fields: &EventFieldsRow<'_>,
    ) -> Result<Option<EventRow>> {
        self.with_conn_mut(|conn| {
            conn.query_row(
                &format!(
                    "UPDATE events
                     SET name = ?1, description = ?2, location = ?3, start_date = ?4,
                         close_registration = ?5, max_attendees = ?6
                     WHERE id = ?7 AND creator_id = ?8
                     RETURNING {}",
                    EVENT_COLUMNS
                ),
                rusqlite::params![
                    fields.name,
                    fields.description,
                    fields.location,
                    fields.start_date,
                    fields.close_registration,
                    fields.max_attendees,
                    id,
                    creator_id
                ],
                map_event,
            )
            .optional()
        })
    }

    /// Returns false when nothing matched; see `update_event_owned`.
    pub fn delete_event_owned(&self, id: &str, creator_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "DELETE FROM events WHERE id = ?1 AND creator_id = ?2",
                [id, creator_id],
            )?;
            Ok(changed > 0)
        })
    }

    /// Event, attendee count, questions with the requester's vote flag and
    /// the requester's attendance, in that order. A missing event returns
    /// `None` before any of the other reads run.
    pub fn get_event_detail(
        &self,
        id: &str,
        requester_id: Option<&str>,
    ) -> Result<Option<EventDetailRow>> {
        self.with_conn(|conn| {
            let Some(event) = query_event(conn, id)? else {
                return Ok(None);
            };

            let attendee_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM attendees WHERE event_id = ?1",
                [id],
                |r| r.get(0),
            )?;

            let mut stmt = conn.prepare(
                "SELECT q.id, q.event_id, q.asked_by, q.question, q.votes, q.created_at,
                        EXISTS (SELECT 1 FROM votes v
                                WHERE v.question_id = q.id AND v.voter_id = ?2)
                 FROM questions q
                 WHERE q.event_id = ?1
                 ORDER BY q.votes DESC, q.created_at, q.rowid",
            )?;
            let questions = stmt
                .query_map(rusqlite::params![id, requester_id], |row| {
                    Ok((map_question(row)?, row.get::<_, bool>(6)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let is_joined = match requester_id {
                Some(user_id) => conn.query_row(
                    "SELECT EXISTS (SELECT 1 FROM attendees WHERE event_id = ?1 AND user_id = ?2)",
                    [id, user_id],
                    |r| r.get(0),
                )?,
                None => false,
            };

            Ok(Some(EventDetailRow {
                event,
                attendee_count,
                is_joined,
                questions,
            }))
        })
    }
}

pub(crate) fn query_event(conn: &Connection, id: &str) -> Result<Option<EventRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM events WHERE id = ?1", EVENT_COLUMNS))?;
    let row = stmt.query_row([id], map_event).optional()?;
    Ok(row)
}

fn map_event(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        start_date: row.get(4)?,
        close_registration: row.get(5)?,
        max_attendees: row.get(6)?,
        creator_id: row.get(7)?,
        created_at: row.get(8)?,
    })
}

pub(crate) fn map_question(row: &Row<'_>) -> rusqlite::Result<QuestionRow> {
    Ok(QuestionRow {
        id: row.get(0)?,
        event_id: row.get(1)?,
        asked_by: row.get(2)?,
        question: row.get(3)?,
        votes: row.get(4)?,
        created_at: row.get(5)?,
    })
}
