// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording job queue for enqueue assertions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use merchsync_core::types::SyncJob;
use merchsync_core::{JobQueue, MerchsyncError};

/// A [`JobQueue`] that records enqueued jobs instead of running them.
#[derive(Debug, Clone, Default)]
pub struct RecordingQueue {
    jobs: Arc<Mutex<Vec<SyncJob>>>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs enqueued so far, in order.
    pub fn jobs(&self) -> Vec<SyncJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobQueue for RecordingQueue {
    async fn enqueue(&self, job: &SyncJob) -> Result<i64, MerchsyncError> {
        let mut jobs = self.jobs.lock().unwrap();
        jobs.push(job.clone());
        Ok(jobs.len() as i64)
    }
}
