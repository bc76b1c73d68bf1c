// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the merchsync service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the merchsync workspace. The storage and
//! remote API crates implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MerchsyncError;
pub use types::{AdapterType, HealthStatus, SyncJob};

// Re-export all adapter traits at crate root.
pub use traits::{CommerceApi, CommerceApiConnector, JobQueue, OptionStore, ServiceAdapter};
