use crate::Database;
use crate::models::{Inserted, NewUser, UserRow};
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, Row, ffi};

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password, salt, session_token, created_at";

impl Database {
    // -- Users --

    /// Inserts a user. A taken email is reported as `Duplicate`, including
    /// when another registration won the race for the same address.
    pub fn create_user(&self, user: &NewUser<'_>) -> Result<Inserted> {
        self.with_conn_mut(|conn| {
            let res = conn.execute(
                "INSERT INTO users (id, first_name, last_name, email, password, salt)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    user.id,
                    user.first_name,
                    user.last_name,
                    user.email,
                    user.password_hash,
                    user.salt
                ],
            );
            match res {
                Ok(_) => Ok(Inserted::Created),
                Err(e) if is_unique_violation(&e) => Ok(Inserted::Duplicate),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    /// Records the most recently issued token. Bookkeeping only; token
    /// verification never reads it.
    pub fn set_session_token(&self, user_id: &str, token: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET session_token = ?1 WHERE id = ?2",
                [token, user_id],
            )?;
            Ok(())
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users WHERE {} = ?1",
        USER_COLUMNS, column
    ))?;

    let row = stmt.query_row([value], map_user).optional()?;
    Ok(row)
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password: row.get(4)?,
        salt: row.get(5)?,
        session_token: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        constraint_code(err),
        Some(ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    constraint_code(err) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use uuid::Uuid;

    /// Inserts a throwaway user and returns its id.
    pub fn seed_user(db: &Database, email: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let outcome = db
            .create_user(&NewUser {
                id: &id,
                first_name: "Test",
                last_name: "User",
                email,
                password_hash: "hash",
                salt: "salt",
            })
            .unwrap();
        assert_eq!(outcome, Inserted::Created);
        id
    }
}
