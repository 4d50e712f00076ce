// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation log operations.
//!
//! Turns are append-only. Rows are ordered by `created_at`, with the implicit
//! rowid breaking ties so insertion order survives equal timestamps.

use std::str::FromStr;

use rusqlite::params;
use tripmate_core::{now_timestamp, NewTurn, Role, TripmateError, Turn};

use crate::database::{map_tr_err, Database};

/// Append a turn, assigning its id and timestamp.
pub async fn append_turn(db: &Database, turn: NewTurn) -> Result<Turn, TripmateError> {
    let stored = Turn {
        id: uuid::Uuid::new_v4().to_string(),
        session_id: turn.session_id,
        role: turn.role,
        content: turn.content,
        timestamp: now_timestamp(),
    };
    let row = stored.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO turns (id, session_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    row.id,
                    row.session_id,
                    row.role.to_string(),
                    row.content,
                    row.timestamp,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(stored)
}

/// List a session's turns in conversation order, keeping the oldest `limit`.
pub async fn list_turns(
    db: &Database,
    session_id: &str,
    limit: Option<i64>,
) -> Result<Vec<Turn>, TripmateError> {
    let session_id = session_id.to_string();
    // A negative LIMIT means "no limit" to SQLite.
    let limit = limit.unwrap_or(-1);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, role, content, created_at
                 FROM turns WHERE session_id = ?1
                 ORDER BY created_at ASC, rowid ASC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![session_id, limit], turn_from_row)?;
            let turns = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(turns)
        })
        .await
        .map_err(map_tr_err)
}

/// List the newest `limit` turns of a session, returned in conversation order.
pub async fn list_recent_turns(
    db: &Database,
    session_id: &str,
    limit: i64,
) -> Result<Vec<Turn>, TripmateError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, role, content, created_at
                 FROM turns WHERE session_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![session_id, limit], turn_from_row)?;
            let mut turns = rows.collect::<Result<Vec<_>, _>>()?;
            turns.reverse();
            Ok(turns)
        })
        .await
        .map_err(map_tr_err)
}

fn turn_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Turn> {
    let role: String = row.get(2)?;
    let role = Role::from_str(&role).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Turn {
        id: row.get(0)?,
        session_id: row.get(1)?,
        role,
        content: row.get(3)?,
        timestamp: row.get(4)?,
    })
}
