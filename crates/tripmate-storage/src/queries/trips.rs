// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trip record, shared trip, and per-user trip operations.
//!
//! Payloads are stored as JSON text and decoded on read.

use rusqlite::params;
use serde_json::Value;
use tripmate_core::{now_timestamp, SharedTrip, TripPayload, TripRecord, TripmateError, UserTrip};

use super::{json_column_err, to_json_text};
use crate::database::{map_tr_err, Database};

/// Length of a share code.
const SHARE_ID_LEN: usize = 8;

fn decode<T: serde::de::DeserializeOwned>(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> Result<T, rusqlite::Error> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text).map_err(|e| json_column_err(idx, e))
}

// --- Session trips ---

pub async fn save_trip(db: &Database, trip: &TripRecord) -> Result<(), TripmateError> {
    let routes = to_json_text(&trip.routes)?;
    let trip_data = to_json_text(&trip.trip_data)?;
    let trip = trip.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO trips (id, session_id, from_location, to_location, duration,
                                    routes, trip_data, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    trip.id,
                    trip.session_id,
                    trip.from_location,
                    trip.to_location,
                    trip.duration,
                    routes,
                    trip_data,
                    trip.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list_trips(db: &Database, limit: i64) -> Result<Vec<TripRecord>, TripmateError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, from_location, to_location, duration,
                        routes, trip_data, created_at
                 FROM trips ORDER BY created_at ASC, rowid ASC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(TripRecord {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    from_location: row.get(2)?,
                    to_location: row.get(3)?,
                    duration: row.get(4)?,
                    routes: decode::<Vec<Value>>(row, 5)?,
                    trip_data: decode::<TripPayload>(row, 6)?,
                    created_at: row.get(7)?,
                })
            })?;
            let trips = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(trips)
        })
        .await
        .map_err(map_tr_err)
}

// --- Shared trips ---

/// Store a payload under a fresh 8-character share code.
pub async fn share_trip(
    db: &Database,
    trip_data: &TripPayload,
) -> Result<SharedTrip, TripmateError> {
    let mut share_id = uuid::Uuid::new_v4().simple().to_string();
    share_id.truncate(SHARE_ID_LEN);
    let shared = SharedTrip {
        share_id,
        trip_data: trip_data.clone(),
        created_at: now_timestamp(),
    };
    let json = to_json_text(&shared.trip_data)?;
    let (id, created_at) = (shared.share_id.clone(), shared.created_at.clone());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO shared_trips (share_id, trip_data, created_at) VALUES (?1, ?2, ?3)",
                params![id, json, created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(shared)
}

pub async fn get_shared_trip(
    db: &Database,
    share_id: &str,
) -> Result<Option<SharedTrip>, TripmateError> {
    let share_id = share_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT share_id, trip_data, created_at FROM shared_trips WHERE share_id = ?1",
            )?;
            let result = stmt.query_row(params![share_id], |row| {
                Ok(SharedTrip {
                    share_id: row.get(0)?,
                    trip_data: decode(row, 1)?,
                    created_at: row.get(2)?,
                })
            });
            match result {
                Ok(trip) => Ok(Some(trip)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

// --- User trips ---

pub async fn save_user_trip(db: &Database, trip: &UserTrip) -> Result<(), TripmateError> {
    let trip_data = to_json_text(&trip.trip_data)?;
    let trip = trip.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO user_trips (trip_id, user_id, trip_data, from_location,
                                         to_location, duration, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    trip.trip_id,
                    trip.user_id,
                    trip_data,
                    trip.from_location,
                    trip.to_location,
                    trip.duration,
                    trip.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// List a user's trips, newest first.
pub async fn list_user_trips(
    db: &Database,
    user_id: &str,
    limit: i64,
) -> Result<Vec<UserTrip>, TripmateError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT trip_id, user_id, trip_data, from_location, to_location, duration,
                        created_at
                 FROM user_trips WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![user_id, limit], |row| {
                Ok(UserTrip {
                    trip_id: row.get(0)?,
                    user_id: row.get(1)?,
                    trip_data: decode(row, 2)?,
                    from_location: row.get(3)?,
                    to_location: row.get(4)?,
                    duration: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?;
            let trips = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(trips)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a trip only when it belongs to `user_id`.
pub async fn delete_user_trip(
    db: &Database,
    trip_id: &str,
    user_id: &str,
) -> Result<bool, TripmateError> {
    let (trip_id, user_id) = (trip_id.to_string(), user_id.to_string());
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM user_trips WHERE trip_id = ?1 AND user_id = ?2",
                params![trip_id, user_id],
            )?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users::create_user;
    use serde_json::json;
    use tempfile::tempdir;
    use tripmate_core::User;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn payload(value: Value) -> TripPayload {
        serde_json::from_value(value).unwrap()
    }

    async fn make_user(db: &Database, user_id: &str) {
        let user = User {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            name: "Traveller".to_string(),
            password_hash: None,
            picture: None,
            auth_provider: "email".to_string(),
            created_at: now_timestamp(),
        };
        create_user(db, &user).await.unwrap();
    }

    fn user_trip(trip_id: &str, user_id: &str, created_at: &str) -> UserTrip {
        UserTrip {
            trip_id: trip_id.to_string(),
            user_id: user_id.to_string(),
            trip_data: payload(json!({"to": "Queenstown"})),
            from_location: String::new(),
            to_location: "Queenstown".to_string(),
            duration: String::new(),
            created_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn save_and_list_trip_records() {
        let (db, _dir) = setup_db().await;

        let trip = TripRecord {
            id: "trip-1".to_string(),
            session_id: "sess-1".to_string(),
            from_location: "Auckland".to_string(),
            to_location: "Rotorua".to_string(),
            duration: "2 days".to_string(),
            routes: vec![json!({"name": "SH1", "distance": "230 km"})],
            trip_data: payload(json!({"from": "Auckland", "to": "Rotorua", "hotels": [1, 2]})),
            created_at: now_timestamp(),
        };
        save_trip(&db, &trip).await.unwrap();

        let trips = list_trips(&db, 1000).await.unwrap();
        assert_eq!(trips, vec![trip]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn share_and_fetch() {
        let (db, _dir) = setup_db().await;

        let data = payload(json!({"to": "Wanaka", "duration": "4 days"}));
        let shared = share_trip(&db, &data).await.unwrap();
        assert_eq!(shared.share_id.len(), 8);

        let fetched = get_shared_trip(&db, &shared.share_id).await.unwrap();
        assert_eq!(fetched.unwrap().trip_data, data);
        assert!(get_shared_trip(&db, "nope1234").await.unwrap().is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn user_trips_newest_first_and_owner_scoped() {
        let (db, _dir) = setup_db().await;
        make_user(&db, "user_a").await;
        make_user(&db, "user_b").await;

        save_user_trip(&db, &user_trip("trip_1", "user_a", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();
        save_user_trip(&db, &user_trip("trip_2", "user_a", "2026-01-01T00:00:02.000Z"))
            .await
            .unwrap();
        save_user_trip(&db, &user_trip("trip_3", "user_b", "2026-01-01T00:00:03.000Z"))
            .await
            .unwrap();

        let trips = list_user_trips(&db, "user_a", 100).await.unwrap();
        let ids: Vec<&str> = trips.iter().map(|t| t.trip_id.as_str()).collect();
        assert_eq!(ids, vec!["trip_2", "trip_1"]);

        // Another user's trip cannot be deleted.
        assert!(!delete_user_trip(&db, "trip_3", "user_a").await.unwrap());
        assert!(delete_user_trip(&db, "trip_1", "user_a").await.unwrap());
        assert!(!delete_user_trip(&db, "trip_1", "user_a").await.unwrap());
        assert_eq!(list_user_trips(&db, "user_a", 100).await.unwrap().len(), 1);

        db.close().await.unwrap();
    }
}
