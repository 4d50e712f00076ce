// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User account operations.

use rusqlite::{params, OptionalExtension};
use tripmate_core::{TripmateError, User};

use crate::database::{map_tr_err, Database};

const USER_COLUMNS: &str =
    "user_id, email, name, password_hash, picture, auth_provider, created_at";

fn map_user(row: &rusqlite::Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        user_id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        picture: row.get(4)?,
        auth_provider: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Insert a user. A duplicate email is reported as invalid input.
pub async fn create_user(db: &Database, user: &User) -> Result<(), TripmateError> {
    let row = user.clone();
    let inserted = db
        .connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO users
                     (user_id, email, name, password_hash, picture, auth_provider, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    row.user_id,
                    row.email.to_lowercase(),
                    row.name,
                    row.password_hash,
                    row.picture,
                    row.auth_provider,
                    row.created_at,
                ],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)?;

    if inserted {
        Ok(())
    } else {
        Err(TripmateError::InvalidInput(
            "Email already registered".to_string(),
        ))
    }
}

pub async fn get_user_by_email(db: &Database, email: &str) -> Result<Option<User>, TripmateError> {
    let email = email.to_lowercase();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                map_user,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_user(db: &Database, user_id: &str) -> Result<Option<User>, TripmateError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
                params![user_id],
                map_user,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}
