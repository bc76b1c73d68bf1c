// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the admin gateway.
//!
//! The settings form posts one flat field set plus the hidden tab
//! discriminator; responses carry the merged record and the per-tab
//! validation flags so the surface can decide which tabs to show.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use merchsync_settings::{
    ErrorFlags, FormInput, SettingsRecord, StateAccess, SyncState, ValidationFlags,
};

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}

/// Response body for settings reads and submissions.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: SettingsRecord,
    pub validation: ValidationFlags,
    pub errors: ErrorFlags,
}

/// Response body for GET /v1/status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// All four readiness checks passed.
    pub ready_for_sync: bool,
    pub validation: ValidationFlags,
    pub sync: SyncState,
    pub errors: ErrorFlags,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

fn internal_error(message: impl std::fmt::Display) -> Response {
    tracing::error!("gateway handler failed: {message}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// GET /health (public)
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /v1/settings
pub async fn get_settings(State(state): State<GatewayState>) -> Response {
    match settings_response(&state).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// POST /v1/settings
///
/// One tab's submission. The orchestrator validates, runs side effects,
/// persists the merged record, and the response reflects the new state.
pub async fn post_settings(
    State(state): State<GatewayState>,
    Json(input): Json<FormInput>,
) -> Response {
    if let Err(e) = state.orchestrator.handle_submission(&input).await {
        return internal_error(e);
    }
    match settings_response(&state).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /v1/status
pub async fn get_status(State(state): State<GatewayState>) -> Response {
    let access = StateAccess::new(state.orchestrator.options());

    let ready = match state.orchestrator.is_ready_for_sync().await {
        Ok(ready) => ready,
        Err(e) => return internal_error(e),
    };
    let validation = match access.validation_flags().await {
        Ok(flags) => flags,
        Err(e) => return internal_error(e),
    };
    let sync = match access.sync_state().await {
        Ok(sync) => sync,
        Err(e) => return internal_error(e),
    };
    let errors = match access.errors().await {
        Ok(errors) => errors,
        Err(e) => return internal_error(e),
    };

    (
        StatusCode::OK,
        Json(StatusResponse {
            ready_for_sync: ready,
            validation,
            sync,
            errors,
        }),
    )
        .into_response()
}

/// GET /v1/lists
///
/// The account's audience lists (cached), for the newsletter tab's picker.
pub async fn get_lists(State(state): State<GatewayState>) -> Response {
    match state.orchestrator.get_lists().await {
        Ok(lists) => (StatusCode::OK, Json(lists)).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn settings_response(
    state: &GatewayState,
) -> Result<SettingsResponse, merchsync_core::MerchsyncError> {
    let access = StateAccess::new(state.orchestrator.options());
    Ok(SettingsResponse {
        settings: state.orchestrator.load_settings().await?,
        validation: access.validation_flags().await?,
        errors: access.errors().await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }

    #[test]
    fn status_response_serializes_nested_state() {
        let resp = StatusResponse {
            ready_for_sync: false,
            validation: ValidationFlags {
                api_ping: Some(true),
                store_info: None,
                campaign_defaults: None,
            },
            sync: SyncState::default(),
            errors: ErrorFlags::default(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"ready_for_sync\":false"));
        assert!(json.contains("\"api_ping\":true"));
        assert!(json.contains("\"syncing\":false"));
    }

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "something went wrong".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("something went wrong"));
    }
}
