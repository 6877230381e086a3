use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY,
            first_name      TEXT NOT NULL,
            last_name       TEXT NOT NULL,
            email           TEXT NOT NULL UNIQUE,
            password        TEXT NOT NULL,
            salt            TEXT NOT NULL,
            session_token   TEXT,
            created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS events (
            id                  TEXT PRIMARY KEY,
            name                TEXT NOT NULL,
            description         TEXT NOT NULL,
            location            TEXT NOT NULL,
            start_date          TEXT NOT NULL,
            close_registration  TEXT NOT NULL,
            max_attendees       INTEGER NOT NULL,
            creator_id          TEXT NOT NULL REFERENCES users(id),
            created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_events_creator
            ON events(creator_id);

        CREATE TABLE IF NOT EXISTS attendees (
            event_id    TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            user_id     TEXT NOT NULL REFERENCES users(id),
            joined_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (event_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS questions (
            id          TEXT PRIMARY KEY,
            event_id    TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            asked_by    TEXT NOT NULL REFERENCES users(id),
            question    TEXT NOT NULL,
            votes       INTEGER NOT NULL DEFAULT 0 CHECK (votes >= 0),
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_questions_event
            ON questions(event_id);

        CREATE TABLE IF NOT EXISTS votes (
            question_id TEXT NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
            voter_id    TEXT NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (question_id, voter_id)
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
