// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `merchsync serve` command implementation.
//!
//! Starts the admin gateway and the background sync worker over shared
//! SQLite storage, with graceful shutdown on SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use merchsync_config::model::MerchsyncConfig;
use merchsync_core::MerchsyncError;
use merchsync_core::types::SyncJob;
use merchsync_gateway::{AuthConfig, GatewayState, ServerConfig};
use merchsync_mailchimp::MailchimpConnector;
use merchsync_settings::{SettingsOrchestrator, SiteIdentity, StateAccess};
use merchsync_storage::Database;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::worker;

/// Runs the `merchsync serve` command.
pub async fn run_serve(config: MerchsyncConfig) -> Result<(), MerchsyncError> {
    init_tracing(&config.service.log_level);

    info!("starting merchsync serve");

    let db = Database::open_with(&config.storage.database_path, config.storage.wal_mode).await?;

    let orchestrator = Arc::new(build_orchestrator(&config, &db));

    if config.gateway.enabled && config.gateway.bearer_token.is_none() {
        warn!("gateway enabled without a bearer token: admin requests will be rejected");
    }

    let cancel = install_signal_handler();

    // Gateway server task.
    if config.gateway.enabled {
        let state = GatewayState {
            orchestrator: orchestrator.clone(),
            db: db.clone(),
            auth: AuthConfig {
                bearer_token: config.gateway.bearer_token.clone(),
            },
            start_time: std::time::Instant::now(),
        };
        let server_config = ServerConfig {
            host: config.gateway.host.clone(),
            port: config.gateway.port,
            bearer_token: config.gateway.bearer_token.clone(),
        };
        let gateway_cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = merchsync_gateway::start_server(&server_config, state) => {
                    if let Err(e) = result {
                        error!(error = %e, "gateway server error");
                    }
                }
                _ = gateway_cancel.cancelled() => {}
            }
        });
    } else {
        info!("gateway disabled by configuration");
    }

    // Sync worker runs on the main task until shutdown.
    worker::run_worker(
        db.clone(),
        orchestrator,
        Duration::from_secs(config.service.worker_poll_secs),
        cancel,
    )
    .await;

    db.close().await?;
    info!("merchsync serve shutdown complete");
    Ok(())
}

/// Runs the `merchsync sync` command: restart the background sync.
pub async fn run_sync_restart(config: MerchsyncConfig) -> Result<(), MerchsyncError> {
    init_tracing(&config.service.log_level);

    let db = Database::open_with(&config.storage.database_path, config.storage.wal_mode).await?;

    let state = StateAccess::new(&db);
    state.reset_sync_started().await?;
    state
        .flag_sync_started(chrono::Utc::now().timestamp())
        .await?;

    use merchsync_core::JobQueue;
    let job_id = db.enqueue(&SyncJob::Products).await?;
    println!("submitted store sync (job {job_id})");

    db.close().await?;
    Ok(())
}

fn build_orchestrator(
    config: &MerchsyncConfig,
    db: &Database,
) -> SettingsOrchestrator<MailchimpConnector, Database, Database> {
    SettingsOrchestrator::new(
        MailchimpConnector::new(config.mailchimp.api_base.clone()),
        db.clone(),
        db.clone(),
        SiteIdentity {
            name: config.site.name.clone(),
            url: config.site.url.clone(),
            platform: config.site.platform.clone(),
        },
    )
}

/// Install SIGINT/SIGTERM handlers that trip a cancellation token.
fn install_signal_handler() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trip = cancel.clone();
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("install SIGTERM handler");
            tokio::select! {
                _ = ctrl_c => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
        }

        info!("shutdown signal received");
        trip.cancel();
    });
    cancel
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("merchsync={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
