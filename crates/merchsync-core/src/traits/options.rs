// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Option store trait for persisted plugin state.
//!
//! State is addressed by dotted path (`sync.started_at`, `validation.api.ping`)
//! and stored as JSON values. A separate time-boxed cache namespace backs
//! readiness lookups that must not hit the remote API on every call.

use async_trait::async_trait;

use crate::error::MerchsyncError;

/// Persisted key/value state addressable by dotted path.
#[async_trait]
pub trait OptionStore: Send + Sync {
    /// Read the value at `path`, or `None` when unset.
    async fn get(&self, path: &str) -> Result<Option<serde_json::Value>, MerchsyncError>;

    /// Write the value at `path`, replacing any previous value.
    async fn set(&self, path: &str, value: serde_json::Value) -> Result<(), MerchsyncError>;

    /// Remove the value at `path`. Removing an unset path is not an error.
    async fn delete(&self, path: &str) -> Result<(), MerchsyncError>;

    /// Write the value at `path` only if the path is currently unset.
    ///
    /// Returns `true` when this call claimed the path. The check and the
    /// write are a single atomic operation; two concurrent callers cannot
    /// both observe `true`.
    async fn set_if_absent(
        &self,
        path: &str,
        value: serde_json::Value,
    ) -> Result<bool, MerchsyncError>;

    /// Read a cached value, or `None` when missing or expired.
    async fn get_cached(&self, key: &str) -> Result<Option<serde_json::Value>, MerchsyncError>;

    /// Cache a value under `key` for `ttl_secs` seconds.
    async fn set_cached(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl_secs: u64,
    ) -> Result<(), MerchsyncError>;
}
