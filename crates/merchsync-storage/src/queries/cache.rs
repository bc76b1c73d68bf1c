// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-boxed cache operations.
//!
//! Entries carry an absolute expiry timestamp; a read past expiry behaves as
//! a miss. Expired rows are lazily overwritten on the next write and can be
//! swept with [`purge_expired`].

use merchsync_core::MerchsyncError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Read a cached value, or `None` when missing or expired.
pub async fn get(
    db: &Database,
    key: &str,
) -> Result<Option<serde_json::Value>, MerchsyncError> {
    let key = key.to_string();
    let raw: Option<String> = db
        .connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT value FROM cache
                 WHERE key = ?1 AND expires_at > strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![key],
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

/// Cache a value under `key` for `ttl_secs` seconds, replacing any previous
/// entry for the key.
pub async fn set(
    db: &Database,
    key: &str,
    value: &serde_json::Value,
    ttl_secs: u64,
) -> Result<(), MerchsyncError> {
    let key = key.to_string();
    let text = value.to_string();
    let offset = format!("+{ttl_secs} seconds");
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO cache (key, value, expires_at)
                 VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?3))",
                params![key, text, offset],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Delete all expired cache rows. Returns the number of rows removed.
pub async fn purge_expired(db: &Database) -> Result<usize, MerchsyncError> {
    db.connection()
        .call(|conn| {
            let removed = conn.execute(
                "DELETE FROM cache WHERE expires_at <= strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                [],
            )?;
            Ok(removed)
        })
        .await
        .map_err(map_tr_err)
}
