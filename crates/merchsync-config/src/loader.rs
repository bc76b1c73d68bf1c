// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./merchsync.toml` > `~/.config/merchsync/merchsync.toml`
//! > `/etc/merchsync/merchsync.toml` with environment variable overrides via
//! `MERCHSYNC_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MerchsyncConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/merchsync/merchsync.toml` (system-wide)
/// 3. `~/.config/merchsync/merchsync.toml` (user XDG config)
/// 4. `./merchsync.toml` (local directory)
/// 5. `MERCHSYNC_*` environment variables
pub fn load_config() -> Result<MerchsyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MerchsyncConfig::default()))
        .merge(Toml::file("/etc/merchsync/merchsync.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("merchsync/merchsync.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("merchsync.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MerchsyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MerchsyncConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MerchsyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MerchsyncConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `MERCHSYNC_STORAGE_DATABASE_PATH` must
/// map to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("MERCHSYNC_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: MERCHSYNC_GATEWAY_BEARER_TOKEN -> "gateway_bearer_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("site_", "site.", 1)
            .replacen("mailchimp_", "mailchimp.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}
