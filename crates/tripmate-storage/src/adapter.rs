// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use tripmate_config::model::StorageConfig;
use tripmate_core::{
    AdapterType, HealthStatus, NewTurn, PluginAdapter, SharedTrip, StorageAdapter, TripPayload,
    TripRecord, TripmateError, Turn, User, UserTrip,
};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, TripmateError> {
        self.db.get().ok_or_else(|| TripmateError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TripmateError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TripmateError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), TripmateError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| TripmateError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), TripmateError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Conversation log ---

    async fn append_turn(&self, turn: NewTurn) -> Result<Turn, TripmateError> {
        queries::turns::append_turn(self.db()?, turn).await
    }

    async fn list_turns(
        &self,
        session_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Turn>, TripmateError> {
        queries::turns::list_turns(self.db()?, session_id, limit).await
    }

    async fn list_recent_turns(
        &self,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<Turn>, TripmateError> {
        queries::turns::list_recent_turns(self.db()?, session_id, limit).await
    }

    // --- Trip records ---

    async fn save_trip(&self, trip: &TripRecord) -> Result<(), TripmateError> {
        queries::trips::save_trip(self.db()?, trip).await
    }

    async fn list_trips(&self, limit: i64) -> Result<Vec<TripRecord>, TripmateError> {
        queries::trips::list_trips(self.db()?, limit).await
    }

    async fn share_trip(&self, trip_data: &TripPayload) -> Result<SharedTrip, TripmateError> {
        queries::trips::share_trip(self.db()?, trip_data).await
    }

    async fn get_shared_trip(&self, share_id: &str) -> Result<Option<SharedTrip>, TripmateError> {
        queries::trips::get_shared_trip(self.db()?, share_id).await
    }

    // --- Users ---

    async fn create_user(&self, user: &User) -> Result<(), TripmateError> {
        queries::users::create_user(self.db()?, user).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, TripmateError> {
        queries::users::get_user_by_email(self.db()?, email).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, TripmateError> {
        queries::users::get_user(self.db()?, user_id).await
    }

    async fn save_user_trip(&self, trip: &UserTrip) -> Result<(), TripmateError> {
        queries::trips::save_user_trip(self.db()?, trip).await
    }

    async fn list_user_trips(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<UserTrip>, TripmateError> {
        queries::trips::list_user_trips(self.db()?, user_id, limit).await
    }

    async fn delete_user_trip(
        &self,
        trip_id: &str,
        user_id: &str,
    ) -> Result<bool, TripmateError> {
        queries::trips::delete_user_trip(self.db()?, trip_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tripmate_core::Role;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_tracks_initialization() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn conversation_round_trip_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        storage
            .append_turn(NewTurn::user("sess-1", "Plan a 3 day trip to Queenstown"))
            .await
            .unwrap();
        storage
            .append_turn(NewTurn::assistant("sess-1", "Sure! Here is your plan."))
            .await
            .unwrap();

        let turns = storage.list_turns("sess-1", Some(100)).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[1].role, Role::Assistant);

        storage.close().await.unwrap();
        storage.shutdown().await.unwrap();
    }
}
