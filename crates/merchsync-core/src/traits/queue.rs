// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background job enqueue contract.

use async_trait::async_trait;

use crate::error::MerchsyncError;
use crate::types::SyncJob;

/// Accepts background sync work for later, at-least-once execution.
///
/// `enqueue` returns as soon as the job is durably recorded; execution
/// happens outside the enqueuing request, possibly after it has completed.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Record a job for background execution. Returns the queue entry id.
    async fn enqueue(&self, job: &SyncJob) -> Result<i64, MerchsyncError>;
}
