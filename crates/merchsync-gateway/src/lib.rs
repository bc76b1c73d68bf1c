// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin HTTP gateway for the merchsync service.
//!
//! The gateway is the admin-surface boundary: a tabbed settings form posts
//! one flat field set plus a hidden tab discriminator to
//! `POST /v1/settings`, and reads validation/sync/error state back from
//! `GET /v1/settings` and `GET /v1/status` to decide which tabs to show.
//! A developer-only debug surface under `/v1/debug/{action}` exposes the
//! remote client operations directly.

pub mod auth;
pub mod debug;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{GatewayState, Orchestrator, ServerConfig, router, start_server};
