// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait implementations for the SQLite backend.
//!
//! `Database` is the concrete [`OptionStore`] and [`JobQueue`] used by the
//! running service; tests swap in the in-memory doubles from
//! `merchsync-test-utils`.

use async_trait::async_trait;

use merchsync_core::types::{AdapterType, HealthStatus, SyncJob};
use merchsync_core::{JobQueue, MerchsyncError, OptionStore, ServiceAdapter};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// Queue name under which background sync jobs are recorded.
pub const SYNC_QUEUE: &str = "sync";

#[async_trait]
impl ServiceAdapter for Database {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MerchsyncError> {
        let result = self
            .connection()
            .call(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await;
        match result {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), MerchsyncError> {
        // Closing consumes the handle; clones share the writer thread, so a
        // shared shutdown only flushes.
        self.connection()
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl OptionStore for Database {
    async fn get(&self, path: &str) -> Result<Option<serde_json::Value>, MerchsyncError> {
        queries::options::get(self, path).await
    }

    async fn set(&self, path: &str, value: serde_json::Value) -> Result<(), MerchsyncError> {
        queries::options::set(self, path, &value).await
    }

    async fn delete(&self, path: &str) -> Result<(), MerchsyncError> {
        queries::options::delete(self, path).await
    }

    async fn set_if_absent(
        &self,
        path: &str,
        value: serde_json::Value,
    ) -> Result<bool, MerchsyncError> {
        queries::options::set_if_absent(self, path, &value).await
    }

    async fn get_cached(&self, key: &str) -> Result<Option<serde_json::Value>, MerchsyncError> {
        queries::cache::get(self, key).await
    }

    async fn set_cached(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl_secs: u64,
    ) -> Result<(), MerchsyncError> {
        queries::cache::set(self, key, &value, ttl_secs).await
    }
}

#[async_trait]
impl JobQueue for Database {
    async fn enqueue(&self, job: &SyncJob) -> Result<i64, MerchsyncError> {
        let payload = serde_json::to_string(job).map_err(|e| MerchsyncError::Storage {
            source: Box::new(e),
        })?;
        let id = queries::queue::enqueue(self, SYNC_QUEUE, &payload).await?;
        tracing::debug!(id, job = ?job, "sync job enqueued");
        Ok(id)
    }
}
