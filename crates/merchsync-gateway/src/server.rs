// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the admin surface.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use merchsync_core::MerchsyncError;
use merchsync_mailchimp::MailchimpConnector;
use merchsync_settings::SettingsOrchestrator;
use merchsync_storage::Database;

use crate::auth::{AuthConfig, auth_middleware};
use crate::debug;
use crate::handlers;

/// The concrete orchestrator the gateway serves.
pub type Orchestrator = SettingsOrchestrator<MailchimpConnector, Database, Database>;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The settings orchestrator.
    pub orchestrator: Arc<Orchestrator>,
    /// Direct database handle for queue-level operations.
    pub db: Database,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

/// Gateway server configuration (mirrors GatewayConfig from merchsync-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Bearer token for auth (None = all admin requests rejected).
    pub bearer_token: Option<String>,
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    // Unauthenticated public route (health for process supervisors).
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    // Routes requiring authentication.
    let api_routes = Router::new()
        .route(
            "/v1/settings",
            get(handlers::get_settings).post(handlers::post_settings),
        )
        .route("/v1/status", get(handlers::get_status))
        .route("/v1/lists", get(handlers::get_lists))
        .route("/v1/debug/{action}", post(debug::run_debug_action))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
) -> Result<(), MerchsyncError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| MerchsyncError::Internal(format!(
                "failed to bind gateway to {addr}: {e}"
            )))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| MerchsyncError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
