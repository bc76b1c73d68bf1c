// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `merchsync status` command implementation.
//!
//! Connects to the gateway health endpoint to display service state, then
//! (when a bearer token is configured) the readiness and sync state. Falls
//! back gracefully when the service is not running.

use std::io::IsTerminal;
use std::time::Duration;

use merchsync_config::model::MerchsyncConfig;
use merchsync_core::MerchsyncError;
use serde::{Deserialize, Serialize};

/// Health endpoint response from the gateway.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    uptime_secs: u64,
}

/// Subset of GET /v1/status this command renders.
#[derive(Debug, Default, Deserialize, Serialize)]
struct SyncStatus {
    ready_for_sync: bool,
    #[serde(default)]
    sync: SyncFlags,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct SyncFlags {
    syncing: bool,
    started_at: Option<i64>,
    completed_at: Option<i64>,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
struct StatusOutput {
    running: bool,
    status: String,
    uptime_secs: Option<u64>,
    gateway_host: String,
    gateway_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    sync: Option<SyncStatus>,
}

/// Format seconds into a human-readable duration string.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Run the `merchsync status` command.
pub async fn run_status(
    config: &MerchsyncConfig,
    json: bool,
    plain: bool,
) -> Result<(), MerchsyncError> {
    let host = &config.gateway.host;
    let port = config.gateway.port;
    let health_url = format!("http://{host}:{port}/health");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| MerchsyncError::Internal(format!("failed to create HTTP client: {e}")))?;

    let health = match client.get(&health_url).send().await {
        Ok(resp) if resp.status().is_success() => resp.json::<HealthResponse>().await.ok(),
        _ => None,
    };

    let sync = match (&health, &config.gateway.bearer_token) {
        (Some(_), Some(token)) => {
            let status_url = format!("http://{host}:{port}/v1/status");
            match client.get(&status_url).bearer_auth(token).send().await {
                Ok(resp) if resp.status().is_success() => resp.json::<SyncStatus>().await.ok(),
                _ => None,
            }
        }
        _ => None,
    };

    if json {
        let output = match &health {
            Some(health) => StatusOutput {
                running: true,
                status: health.status.clone(),
                uptime_secs: Some(health.uptime_secs),
                gateway_host: host.clone(),
                gateway_port: port,
                sync,
            },
            None => StatusOutput {
                running: false,
                status: "not running".to_string(),
                uptime_secs: None,
                gateway_host: host.clone(),
                gateway_port: port,
                sync: None,
            },
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    let use_color = !plain && std::io::stdout().is_terminal();
    match health {
        Some(health) => {
            print_status_running(&health.status, &format_uptime(health.uptime_secs), use_color);
            if let Some(sync) = sync {
                print_sync_state(&sync, use_color);
            }
        }
        None => print_status_offline(host, port, use_color),
    }

    Ok(())
}

/// Print running status with optional colors.
fn print_status_running(status: &str, uptime: &str, use_color: bool) {
    println!();
    println!("  merchsync status");
    println!("  {}", "-".repeat(35));

    if use_color {
        use colored::Colorize;
        println!(
            "    State:    {} {} (uptime: {})",
            "✓".green(),
            status.green(),
            uptime
        );
    } else {
        println!("    State:    [OK] {status} (uptime: {uptime})");
    }
}

/// Print readiness and sync progress.
fn print_sync_state(status: &SyncStatus, use_color: bool) {
    let ready = if status.ready_for_sync { "yes" } else { "no" };
    if use_color {
        use colored::Colorize;
        let rendered = if status.ready_for_sync {
            ready.green()
        } else {
            ready.yellow()
        };
        println!("    Ready:    {rendered}");
    } else {
        println!("    Ready:    {ready}");
    }
    println!("    Syncing:  {}", status.sync.syncing);
    if let Some(at) = status.sync.completed_at {
        println!("    Last sync completed at {at}");
    }
    println!();
}

/// Print offline status with optional colors.
fn print_status_offline(host: &str, port: u16, use_color: bool) {
    println!();
    println!("  merchsync status");
    println!("  {}", "-".repeat(35));

    if use_color {
        use colored::Colorize;
        println!("    State:    {} {}", "✗".red(), "not running".red());
    } else {
        println!("    State:    [FAIL] not running");
    }

    println!("    Endpoint: http://{host}:{port}/health");
    println!();
    println!("  Start with: merchsync serve");
    println!();
}
