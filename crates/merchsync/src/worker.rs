// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The background sync worker.
//!
//! Drains the sync job queue, maintaining the sync lifecycle flags:
//! `sync.syncing` is set while a job runs, `sync.completed_at` is stamped
//! when it finishes. Jobs are acked on success and failed (with the queue's
//! bounded retries) on error, so execution is at-least-once.

use std::time::Duration;

use merchsync_core::MerchsyncError;
use merchsync_core::types::SyncJob;
use merchsync_gateway::Orchestrator;
use merchsync_settings::StateAccess;
use merchsync_storage::{Database, SYNC_QUEUE, queries};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Run the worker loop until cancelled.
pub async fn run_worker(
    db: Database,
    orchestrator: std::sync::Arc<Orchestrator>,
    poll_interval: Duration,
    cancel: CancellationToken,
) {
    info!(poll_secs = poll_interval.as_secs(), "sync worker started");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("sync worker shutting down");
                break;
            }
            result = drain_once(&db, orchestrator.as_ref()) => {
                match result {
                    // Something was processed; look for more right away.
                    Ok(true) => {}
                    Ok(false) => {
                        tokio::select! {
                            _ = cancel.cancelled() => {}
                            _ = tokio::time::sleep(poll_interval) => {}
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "worker cycle failed");
                        tokio::select! {
                            _ = cancel.cancelled() => {}
                            _ = tokio::time::sleep(poll_interval) => {}
                        }
                    }
                }
            }
        }
    }
}

/// Process at most one queue entry. Returns whether one was found.
pub async fn drain_once(
    db: &Database,
    orchestrator: &Orchestrator,
) -> Result<bool, MerchsyncError> {
    let Some(entry) = queries::queue::dequeue(db, SYNC_QUEUE).await? else {
        return Ok(false);
    };

    match serde_json::from_str::<SyncJob>(&entry.payload) {
        Ok(job) => match run_job(db, orchestrator, &job).await {
            Ok(()) => {
                queries::queue::ack(db, entry.id).await?;
                info!(id = entry.id, job = ?job, "sync job completed");
            }
            Err(e) => {
                warn!(id = entry.id, error = %e, "sync job failed");
                queries::queue::fail(db, entry.id).await?;
            }
        },
        Err(e) => {
            // A payload we cannot parse will never succeed; let the queue's
            // attempt limit retire it.
            warn!(id = entry.id, error = %e, "malformed job payload");
            queries::queue::fail(db, entry.id).await?;
        }
    }

    Ok(true)
}

/// Execute one job inside the syncing/completed lifecycle flags.
async fn run_job(
    db: &Database,
    orchestrator: &Orchestrator,
    job: &SyncJob,
) -> Result<(), MerchsyncError> {
    let state = StateAccess::new(db);
    state.set_syncing(true).await?;

    let result = execute_job(orchestrator, job).await;

    state.set_syncing(false).await?;
    if result.is_ok() {
        state
            .stamp_sync_completed(chrono::Utc::now().timestamp())
            .await?;
    }
    result
}

/// The job body: reconcile against the remote side.
///
/// Requires full readiness; a job picked up before the store is wired ends
/// up back in the queue for a later attempt.
async fn execute_job(
    orchestrator: &Orchestrator,
    job: &SyncJob,
) -> Result<(), MerchsyncError> {
    if !orchestrator.is_ready_for_sync().await? {
        return Err(MerchsyncError::api("store is not ready for sync"));
    }

    let Some(api) = orchestrator.stored_api().await? else {
        return Err(MerchsyncError::api("no valid API key configured"));
    };
    let store_id = &orchestrator.site().url;

    use merchsync_core::CommerceApi;
    match job {
        SyncJob::Products => {
            let page = api.products(store_id, 1, 100).await?;
            info!(
                total = page.total_items,
                "remote product catalog reconciled"
            );
        }
        SyncJob::Orders => {
            let page = api.orders(store_id, 1, 100).await?;
            info!(total = page.total_items, "remote order history reconciled");
        }
        SyncJob::SingleOrder { order_id } => {
            debug!(order_id = %order_id, "reconciling single order");
            let page = api.orders(store_id, 1, 100).await?;
            let present = page.items.iter().any(|o| &o.id == order_id);
            info!(order_id = %order_id, present, "single order reconciled");
        }
    }
    Ok(())
}
