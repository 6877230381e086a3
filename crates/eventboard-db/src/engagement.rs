use anyhow::Result;
use rusqlite::TransactionBehavior;
use tracing::debug;

use crate::Database;
use crate::events::{map_question, query_event};
use crate::models::{AttendOutcome, QuestionInsert, QuestionRow, VoteOutcome};
use crate::queries::{OptionalExt, is_foreign_key_violation, is_unique_violation};

impl Database {
    // -- Attendees --

    pub fn attend_event(&self, event_id: &str, user_id: &str) -> Result<AttendOutcome> {
        self.with_conn_mut(|conn| {
            if query_event(conn, event_id)?.is_none() {
                return Ok(AttendOutcome::EventMissing);
            }

            let res = conn.execute(
                "INSERT INTO attendees (event_id, user_id) VALUES (?1, ?2)",
                [event_id, user_id],
            );
            match res {
                Ok(_) => Ok(AttendOutcome::Joined),
                Err(e) if is_unique_violation(&e) => Ok(AttendOutcome::AlreadyAttending),
                Err(e) => Err(e.into()),
            }
        })
    }

    // -- Questions --

    /// Inserts with zero votes. The event is not read first; a dangling
    /// event id is caught by the foreign key.
    pub fn insert_question(
        &self,
        id: &str,
        event_id: &str,
        asked_by: &str,
        text: &str,
    ) -> Result<QuestionInsert> {
        self.with_conn_mut(|conn| {
            let res = conn.query_row(
                "INSERT INTO questions (id, event_id, asked_by, question, votes)
                 VALUES (?1, ?2, ?3, ?4, 0)
                 RETURNING id, event_id, asked_by, question, votes, created_at",
                [id, event_id, asked_by, text],
                map_question,
            );
            match res {
                Ok(row) => Ok(QuestionInsert::Created(row)),
                Err(e) if is_foreign_key_violation(&e) => {
                    // The asker may be the dangling reference instead.
                    if query_event(conn, event_id)?.is_none() {
                        Ok(QuestionInsert::EventMissing)
                    } else {
                        Err(e.into())
                    }
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn list_questions(&self, event_id: &str) -> Result<Vec<QuestionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, event_id, asked_by, question, votes, created_at
                 FROM questions
                 WHERE event_id = ?1
                 ORDER BY votes DESC, created_at, rowid",
            )?;
            let rows = stmt
                .query_map([event_id], map_question)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_question(&self, id: &str) -> Result<Option<QuestionRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, event_id, asked_by, question, votes, created_at
                 FROM questions WHERE id = ?1",
                [id],
                map_question,
            )
            .optional()
        })
    }

    // -- Votes --

    /// Inserts the vote row and bumps the question's counter in one
    /// IMMEDIATE transaction. Dropping the transaction on any early return
    /// rolls both back, so `votes` always equals the number of vote rows.
    pub fn record_vote(&self, question_id: &str, voter_id: &str) -> Result<VoteOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let exists: bool = tx.query_row(
                "SELECT EXISTS (SELECT 1 FROM questions WHERE id = ?1)",
                [question_id],
                |r| r.get(0),
            )?;
            if !exists {
                return Ok(VoteOutcome::QuestionMissing);
            }

            let res = tx.execute(
                "INSERT INTO votes (question_id, voter_id) VALUES (?1, ?2)",
                [question_id, voter_id],
            );
            match res {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => {
                    debug!("Duplicate vote on {} by {}", question_id, voter_id);
                    return Ok(VoteOutcome::AlreadyVoted);
                }
                Err(e) => return Err(e.into()),
            }

            let bumped = tx.execute(
                "UPDATE questions SET votes = votes + 1 WHERE id = ?1",
                [question_id],
            )?;
            if bumped != 1 {
                anyhow::bail!("Vote counter update touched {} rows for {}", bumped, question_id);
            }

            tx.commit()?;
            Ok(VoteOutcome::Recorded)
        })
    }
}
