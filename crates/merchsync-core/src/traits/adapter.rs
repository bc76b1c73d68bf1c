// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait implemented by the service's pluggable backends.

use async_trait::async_trait;

use crate::error::MerchsyncError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for merchsync adapters.
///
/// Every adapter (remote API client, storage backend) implements this trait,
/// which provides identity, lifecycle, and health check capabilities.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter (api, storage).
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, MerchsyncError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), MerchsyncError>;
}
