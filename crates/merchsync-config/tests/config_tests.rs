// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the merchsync configuration system.

use merchsync_config::diagnostic::{ConfigError, suggest_key};
use merchsync_config::model::MerchsyncConfig;
use merchsync_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_merchsync_config() {
    let toml = r#"
[service]
name = "test-sync"
log_level = "debug"
worker_poll_secs = 2

[site]
name = "Example Shop"
url = "https://shop.example.com"
platform = "merchsync"

[mailchimp]
api_base = "https://us6.api.mailchimp.com/3.0"

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[gateway]
enabled = true
host = "0.0.0.0"
port = 9000
bearer_token = "secret"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "test-sync");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.service.worker_poll_secs, 2);
    assert_eq!(config.site.name, "Example Shop");
    assert_eq!(config.site.url, "https://shop.example.com");
    assert_eq!(
        config.mailchimp.api_base.as_deref(),
        Some("https://us6.api.mailchimp.com/3.0")
    );
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 9000);
    assert_eq!(config.gateway.bearer_token.as_deref(), Some("secret"));
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.service.name, "merchsync");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.site.name, "My Store");
    assert_eq!(config.site.url, "http://localhost");
    assert_eq!(config.site.platform, "merchsync");
    assert!(config.mailchimp.api_base.is_none());
    assert!(config.storage.wal_mode);
    assert!(config.gateway.enabled);
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 8920);
    assert!(config.gateway.bearer_token.is_none());
}

/// Unknown field in [site] section is rejected by deny_unknown_fields.
#[test]
fn unknown_field_in_site_produces_error() {
    let toml = r#"
[site]
nmae = "typo"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("nmae"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err =
        load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Dot-notation override maps onto gateway.bearer_token (the env-provider
/// contract: MERCHSYNC_GATEWAY_BEARER_TOKEN must not split on every underscore).
#[test]
fn dot_notation_override_sets_bearer_token() {
    use figment::{Figment, providers::Serialized};

    let config: MerchsyncConfig = Figment::new()
        .merge(Serialized::defaults(MerchsyncConfig::default()))
        .merge(("gateway.bearer_token", "xyz-from-env"))
        .extract()
        .expect("should set bearer_token via dot notation");

    assert_eq!(config.gateway.bearer_token.as_deref(), Some("xyz-from-env"));
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: MerchsyncConfig = Figment::new()
        .merge(Serialized::defaults(MerchsyncConfig::default()))
        .merge(Toml::file("/nonexistent/path/merchsync.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.service.name, "merchsync");
}

// ============================================================================
// Diagnostic tests
// ============================================================================

/// Unknown key "nmae" in [site] produces suggestion "did you mean `name`?"
#[test]
fn diagnostic_error_includes_unknown_key() {
    let toml = r#"
[site]
nmae = "typo"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    assert!(!errors.is_empty(), "should have at least one error");

    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys } if {
            key == "nmae"
                && suggestion.as_deref() == Some("name")
                && valid_keys.contains("name")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error for 'nmae' with suggestion 'name', got: {errors:?}"
    );
}

/// Error output includes the list of valid keys for the section.
#[test]
fn diagnostic_error_includes_valid_keys() {
    let toml = r#"
[gateway]
bearer_tken = "abc"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_valid_keys = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { valid_keys, .. } if {
            valid_keys.contains("bearer_token") && valid_keys.contains("host")
        })
    });
    assert!(
        has_valid_keys,
        "error should list valid keys for [gateway] section"
    );
}

/// Unknown key "zzzzzz" with no close match does NOT produce a suggestion.
#[test]
fn diagnostic_no_suggestion_for_distant_typo() {
    let valid_keys = &["name", "url", "platform"];
    assert!(suggest_key("zzzzzz", valid_keys).is_none());
}

/// Invalid type (string where number expected) produces clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[gateway]
port = "not_a_number"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("port"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// ConfigError implements miette::Diagnostic with code and help.
#[test]
fn config_error_implements_diagnostic() {
    use miette::Diagnostic;

    let error = ConfigError::UnknownKey {
        key: "nmae".to_string(),
        suggestion: Some("name".to_string()),
        valid_keys: "name, url, platform".to_string(),
    };

    assert!(error.code().is_some(), "should have diagnostic code");

    let help = error.help().expect("should have help text").to_string();
    assert!(
        help.contains("did you mean `name`"),
        "help should contain suggestion, got: {help}"
    );
}

/// Validation catches a site URL without a scheme.
#[test]
fn validation_catches_scheme_less_site_url() {
    let toml = r#"
[site]
url = "shop.example.com"
"#;

    let errors = load_and_validate_str(toml).expect_err("scheme-less URL should fail");
    let has_validation_error = errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("site.url")),
    );
    assert!(
        has_validation_error,
        "should have validation error for site.url"
    );
}

/// load_and_validate_str with valid TOML returns Ok config.
#[test]
fn load_and_validate_valid_toml() {
    let toml = r#"
[site]
url = "https://shop.example.com"
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.site.url, "https://shop.example.com");
}
