// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the merchsync service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level merchsync configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MerchsyncConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Identity of the storefront being connected.
    #[serde(default)]
    pub site: SiteConfig,

    /// Mailchimp API settings.
    #[serde(default)]
    pub mailchimp: MailchimpConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Admin gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service instance.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds the sync worker sleeps between empty queue polls.
    #[serde(default = "default_worker_poll_secs")]
    pub worker_poll_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            worker_poll_secs: default_worker_poll_secs(),
        }
    }
}

fn default_service_name() -> String {
    "merchsync".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_worker_poll_secs() -> u64 {
    5
}

/// Storefront identity configuration.
///
/// The site URL doubles as the canonical store id on the remote side, so it
/// must be stable across restarts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Human-readable store name. Used as the default for the store-info
    /// and campaign-defaults form fields when left blank.
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Public URL of the storefront. Identifies the remote store object.
    #[serde(default = "default_site_url")]
    pub url: String,

    /// Platform tag reported to the remote API.
    #[serde(default = "default_platform")]
    pub platform: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            url: default_site_url(),
            platform: default_platform(),
        }
    }
}

fn default_site_name() -> String {
    "My Store".to_string()
}

fn default_site_url() -> String {
    "http://localhost".to_string()
}

fn default_platform() -> String {
    "merchsync".to_string()
}

/// Mailchimp API configuration.
///
/// The API key itself is not configured here; it is submitted through the
/// admin surface and persisted in the option store once validated.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailchimpConfig {
    /// Override for the API base URL. `None` derives the datacenter host
    /// from the API key suffix. Intended for tests and proxies.
    #[serde(default)]
    pub api_base: Option<String>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("merchsync").join("merchsync.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("merchsync.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Admin gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Enable the admin gateway.
    #[serde(default = "default_gateway_enabled")]
    pub enabled: bool,

    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token for admin requests. `None` rejects all admin requests
    /// (fail-closed); the public health endpoint stays reachable.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: default_gateway_enabled(),
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
        }
    }
}

fn default_gateway_enabled() -> bool {
    true
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8920
}
