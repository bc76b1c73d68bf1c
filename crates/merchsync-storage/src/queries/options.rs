// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Option store operations: dotted-path keys mapping to JSON values.

use merchsync_core::MerchsyncError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Read the value at `path`, or `None` when unset.
pub async fn get(
    db: &Database,
    path: &str,
) -> Result<Option<serde_json::Value>, MerchsyncError> {
    let path = path.to_string();
    let raw: Option<String> = db
        .connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT value FROM options WHERE path = ?1",
                params![path],
                |row| row.get(0),
            );
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)?;

    match raw {
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| MerchsyncError::Storage {
                source: Box::new(e),
            }),
        None => Ok(None),
    }
}

/// Write the value at `path`, replacing any previous value.
pub async fn set(
    db: &Database,
    path: &str,
    value: &serde_json::Value,
) -> Result<(), MerchsyncError> {
    let path = path.to_string();
    let text = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO options (path, value) VALUES (?1, ?2)
                 ON CONFLICT(path) DO UPDATE SET
                     value = excluded.value,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![path, text],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Remove the value at `path`. Removing an unset path is not an error.
pub async fn delete(db: &Database, path: &str) -> Result<(), MerchsyncError> {
    let path = path.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM options WHERE path = ?1", params![path])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Write the value at `path` only if the path is currently unset.
///
/// The insert races through SQLite's primary-key constraint, so two
/// concurrent callers cannot both claim the path. Returns `true` for the
/// caller whose insert landed.
pub async fn set_if_absent(
    db: &Database,
    path: &str,
    value: &serde_json::Value,
) -> Result<bool, MerchsyncError> {
    let path = path.to_string();
    let text = value.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO options (path, value) VALUES (?1, ?2)",
                params![path, text],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn set_get_delete_round_trip() {
        let (db, _dir) = setup_db().await;

        assert!(get(&db, "sync.syncing").await.unwrap().is_none());

        set(&db, "sync.syncing", &serde_json::json!(true))
            .await
            .unwrap();
        assert_eq!(
            get(&db, "sync.syncing").await.unwrap(),
            Some(serde_json::json!(true))
        );

        delete(&db, "sync.syncing").await.unwrap();
        assert!(get(&db, "sync.syncing").await.unwrap().is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let (db, _dir) = setup_db().await;

        set(&db, "validation.api.ping", &serde_json::json!(false))
            .await
            .unwrap();
        set(&db, "validation.api.ping", &serde_json::json!(true))
            .await
            .unwrap();
        assert_eq!(
            get(&db, "validation.api.ping").await.unwrap(),
            Some(serde_json::json!(true))
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_if_absent_claims_once() {
        let (db, _dir) = setup_db().await;

        let first = set_if_absent(&db, "sync.started_at", &serde_json::json!(1700000000))
            .await
            .unwrap();
        assert!(first);

        let second = set_if_absent(&db, "sync.started_at", &serde_json::json!(1700000099))
            .await
            .unwrap();
        assert!(!second);

        // The original value survives.
        assert_eq!(
            get(&db, "sync.started_at").await.unwrap(),
            Some(serde_json::json!(1700000000))
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn deleting_unset_path_is_ok() {
        let (db, _dir) = setup_db().await;
        delete(&db, "never.set").await.unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn stores_structured_values() {
        let (db, _dir) = setup_db().await;

        let record = serde_json::json!({
            "store_name": "Example Shop",
            "store_city": "Atlanta",
        });
        set(&db, "settings", &record).await.unwrap();
        assert_eq!(get(&db, "settings").await.unwrap(), Some(record));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_set_if_absent_single_winner() {
        let (db, _dir) = setup_db().await;

        let mut handles = Vec::new();
        for i in 0..10 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                set_if_absent(&db, "sync.started_at", &serde_json::json!(i))
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1, "exactly one concurrent claim must win");

        db.close().await.unwrap();
    }
}
