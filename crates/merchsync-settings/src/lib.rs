// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings validation and sync orchestration for merchsync.
//!
//! This crate holds the workflow between the admin surface and the remote
//! API: tabbed form validation, the settings record and its merge policy,
//! typed validation/sync/error state, store sync, list creation, and the
//! readiness checks with their time-boxed caches.

pub mod lists;
pub mod orchestrator;
pub mod readiness;
pub mod record;
pub mod state;
pub mod sync;
pub mod tabs;

pub use orchestrator::{SettingsOrchestrator, SiteIdentity};
pub use readiness::CACHE_TTL_SECS;
pub use record::SettingsRecord;
pub use state::{ErrorFlags, StateAccess, SyncState, ValidationFlags, keys};
pub use tabs::{ACTIVE_TAB_FIELD, FormInput, SettingsTab};
