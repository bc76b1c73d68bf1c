// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as well-formed URLs, non-empty paths, and sane poll
//! intervals.

use crate::diagnostic::ConfigError;
use crate::model::MerchsyncConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MerchsyncConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.site.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "site.name must not be empty".to_string(),
        });
    }

    // The site URL is the canonical store id on the remote side.
    let url = config.site.url.trim();
    if url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "site.url must not be empty".to_string(),
        });
    } else if !url.starts_with("http://") && !url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("site.url `{url}` must start with http:// or https://"),
        });
    }

    if config.site.platform.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "site.platform must not be empty".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if let Some(base) = &config.mailchimp.api_base {
        if !base.starts_with("http://") && !base.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!(
                    "mailchimp.api_base `{base}` must start with http:// or https://"
                ),
            });
        }
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    }

    if config.service.worker_poll_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "service.worker_poll_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
