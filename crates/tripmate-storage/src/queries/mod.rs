// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod trips;
pub mod turns;
pub mod users;

/// Wrap a JSON decode failure of column `idx` as a rusqlite conversion error.
pub(crate) fn json_column_err(idx: usize, e: serde_json::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

/// Serialize a value for a JSON text column.
pub(crate) fn to_json_text<T: serde::Serialize>(value: &T) -> Result<String, tripmate_core::TripmateError> {
    serde_json::to_string(value).map_err(|e| tripmate_core::TripmateError::Storage {
        source: Box::new(e),
    })
}
