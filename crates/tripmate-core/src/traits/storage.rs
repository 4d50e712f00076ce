// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::TripmateError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{NewTurn, SharedTrip, TripPayload, TripRecord, Turn, User, UserTrip};

/// Adapter for storage and persistence backends.
///
/// Conversation turns are append-only: there is no update or delete for a
/// turn, and a session's history only ever grows.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), TripmateError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), TripmateError>;

    // --- Conversation log ---

    /// Appends a turn, assigning its id and timestamp.
    async fn append_turn(&self, turn: NewTurn) -> Result<Turn, TripmateError>;

    /// Lists a session's turns in ascending timestamp order (insertion order
    /// for equal timestamps). `limit` keeps the oldest `limit` turns.
    async fn list_turns(
        &self,
        session_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Turn>, TripmateError>;

    /// Lists the newest `limit` turns of a session, in ascending order.
    async fn list_recent_turns(
        &self,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<Turn>, TripmateError>;

    // --- Trip records ---

    async fn save_trip(&self, trip: &TripRecord) -> Result<(), TripmateError>;

    async fn list_trips(&self, limit: i64) -> Result<Vec<TripRecord>, TripmateError>;

    /// Publishes a payload under a fresh share code.
    async fn share_trip(&self, trip_data: &TripPayload) -> Result<SharedTrip, TripmateError>;

    async fn get_shared_trip(&self, share_id: &str) -> Result<Option<SharedTrip>, TripmateError>;

    // --- Users and their saved trips ---

    /// Creates a user. Fails with [`TripmateError::InvalidInput`] when the
    /// email is already registered.
    async fn create_user(&self, user: &User) -> Result<(), TripmateError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, TripmateError>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, TripmateError>;

    async fn save_user_trip(&self, trip: &UserTrip) -> Result<(), TripmateError>;

    /// Lists a user's trips, newest first.
    async fn list_user_trips(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<UserTrip>, TripmateError>;

    /// Deletes a trip owned by `user_id`. Returns `false` when nothing matched.
    async fn delete_user_trip(&self, trip_id: &str, user_id: &str)
    -> Result<bool, TripmateError>;
}
