// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use merchsync_core::MerchsyncError;
use tracing::info;

use crate::migrations;

/// Handle to the service's SQLite database.
///
/// Cloning is cheap; all clones share the single writer thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path` with WAL enabled.
    pub async fn open(path: &str) -> Result<Self, MerchsyncError> {
        Self::open_with(path, true).await
    }

    /// Open the database at `path`, optionally enabling WAL mode.
    ///
    /// Creates the parent directory, applies PRAGMAs, and runs any pending
    /// migrations before returning.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, MerchsyncError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| MerchsyncError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(map_tr_err)?;

        conn.call(move |conn| {
            let journal_mode = if wal_mode { "WAL" } else { "DELETE" };
            conn.pragma_update(None, "journal_mode", journal_mode)?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;

            migrations::run_migrations(conn)
                .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        info!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying async connection. All queries go through this.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Close the connection, flushing pending writes.
    pub async fn close(self) -> Result<(), MerchsyncError> {
        self.conn.close().await.map_err(map_tr_err)
    }
}

/// Map a tokio-rusqlite error into the service error type.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> MerchsyncError {
    MerchsyncError::Storage {
        source: Box::new(e),
    }
}
