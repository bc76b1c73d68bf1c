// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed access to validation, sync, and error state.
//!
//! The option store addresses state by dotted path; everything in this
//! module goes through the constants below so a path typo is impossible
//! outside one place. Callers only see typed accessors and the snapshot
//! structs served to the status surface.

use serde::Serialize;

use merchsync_core::{MerchsyncError, OptionStore};

/// Option-store paths for plugin state and cache keys.
pub mod keys {
    /// The persisted settings record.
    pub const SETTINGS: &str = "settings";

    pub const VALIDATION_API_PING: &str = "validation.api.ping";
    pub const VALIDATION_STORE_INFO: &str = "validation.store_info";
    pub const VALIDATION_CAMPAIGN_DEFAULTS: &str = "validation.campaign_defaults";

    pub const SYNC_SYNCING: &str = "sync.syncing";
    pub const SYNC_STARTED_AT: &str = "sync.started_at";
    pub const SYNC_COMPLETED_AT: &str = "sync.completed_at";

    pub const STORE_CREATED_AT: &str = "store_created_at";
    pub const STORE_UPDATED_AT: &str = "store_updated_at";

    pub const ERROR_STORE_INFO: &str = "errors.store_info";
    pub const ERROR_MAILCHIMP_LIST: &str = "errors.mailchimp_list";

    /// Cache key for the credential ping result.
    pub const CACHE_PING: &str = "api-ping-check";
    /// Cache key for the audience list listing.
    pub const CACHE_LISTS: &str = "api-lists";
}

/// Per-tab outcomes of the last validation attempt.
///
/// `None` means the tab has never been submitted. The admin surface gates
/// tab visibility on these flags, never on the settings record itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationFlags {
    pub api_ping: Option<bool>,
    pub store_info: Option<bool>,
    pub campaign_defaults: Option<bool>,
}

/// Background sync lifecycle state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncState {
    pub syncing: bool,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub store_created_at: Option<i64>,
    pub store_updated_at: Option<i64>,
}

/// Last recorded remote-call failures, by concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorFlags {
    pub store_info: Option<String>,
    pub mailchimp_list: Option<String>,
}

/// Typed state accessor over an [`OptionStore`].
pub struct StateAccess<'a, S: OptionStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: OptionStore + ?Sized> StateAccess<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    async fn get_bool(&self, path: &str) -> Result<Option<bool>, MerchsyncError> {
        Ok(self.store.get(path).await?.and_then(|v| v.as_bool()))
    }

    async fn get_i64(&self, path: &str) -> Result<Option<i64>, MerchsyncError> {
        Ok(self.store.get(path).await?.and_then(|v| v.as_i64()))
    }

    async fn get_string(&self, path: &str) -> Result<Option<String>, MerchsyncError> {
        Ok(self
            .store
            .get(path)
            .await?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    pub async fn set_api_ping_valid(&self, valid: bool) -> Result<(), MerchsyncError> {
        self.store
            .set(keys::VALIDATION_API_PING, serde_json::json!(valid))
            .await
    }

    pub async fn set_store_info_valid(&self, valid: bool) -> Result<(), MerchsyncError> {
        self.store
            .set(keys::VALIDATION_STORE_INFO, serde_json::json!(valid))
            .await
    }

    pub async fn set_campaign_defaults_valid(&self, valid: bool) -> Result<(), MerchsyncError> {
        self.store
            .set(keys::VALIDATION_CAMPAIGN_DEFAULTS, serde_json::json!(valid))
            .await
    }

    pub async fn record_store_error(&self, message: &str) -> Result<(), MerchsyncError> {
        self.store
            .set(keys::ERROR_STORE_INFO, serde_json::json!(message))
            .await
    }

    pub async fn clear_store_error(&self) -> Result<(), MerchsyncError> {
        self.store.delete(keys::ERROR_STORE_INFO).await
    }

    pub async fn record_list_error(&self, message: &str) -> Result<(), MerchsyncError> {
        self.store
            .set(keys::ERROR_MAILCHIMP_LIST, serde_json::json!(message))
            .await
    }

    pub async fn clear_list_error(&self) -> Result<(), MerchsyncError> {
        self.store.delete(keys::ERROR_MAILCHIMP_LIST).await
    }

    /// Stamp the remote store's creation or last-update time.
    pub async fn stamp_store_synced(&self, new: bool, at: i64) -> Result<(), MerchsyncError> {
        let key = if new {
            keys::STORE_CREATED_AT
        } else {
            keys::STORE_UPDATED_AT
        };
        self.store.set(key, serde_json::json!(at)).await
    }

    /// Claim the one-time "sync started" flag.
    ///
    /// Atomic: of any number of concurrent claimants, exactly one sees
    /// `true` and gets to enqueue the initial sync job.
    pub async fn flag_sync_started(&self, at: i64) -> Result<bool, MerchsyncError> {
        self.store
            .set_if_absent(keys::SYNC_STARTED_AT, serde_json::json!(at))
            .await
    }

    /// Forget that a sync ever started (debug restart path).
    pub async fn reset_sync_started(&self) -> Result<(), MerchsyncError> {
        self.store.delete(keys::SYNC_STARTED_AT).await?;
        self.store.delete(keys::SYNC_COMPLETED_AT).await
    }

    pub async fn set_syncing(&self, syncing: bool) -> Result<(), MerchsyncError> {
        self.store
            .set(keys::SYNC_SYNCING, serde_json::json!(syncing))
            .await
    }

    pub async fn stamp_sync_completed(&self, at: i64) -> Result<(), MerchsyncError> {
        self.store
            .set(keys::SYNC_COMPLETED_AT, serde_json::json!(at))
            .await
    }

    pub async fn validation_flags(&self) -> Result<ValidationFlags, MerchsyncError> {
        Ok(ValidationFlags {
            api_ping: self.get_bool(keys::VALIDATION_API_PING).await?,
            store_info: self.get_bool(keys::VALIDATION_STORE_INFO).await?,
            campaign_defaults: self.get_bool(keys::VALIDATION_CAMPAIGN_DEFAULTS).await?,
        })
    }

    pub async fn sync_state(&self) -> Result<SyncState, MerchsyncError> {
        Ok(SyncState {
            syncing: self.get_bool(keys::SYNC_SYNCING).await?.unwrap_or(false),
            started_at: self.get_i64(keys::SYNC_STARTED_AT).await?,
            completed_at: self.get_i64(keys::SYNC_COMPLETED_AT).await?,
            store_created_at: self.get_i64(keys::STORE_CREATED_AT).await?,
            store_updated_at: self.get_i64(keys::STORE_UPDATED_AT).await?,
        })
    }

    pub async fn errors(&self) -> Result<ErrorFlags, MerchsyncError> {
        Ok(ErrorFlags {
            store_info: self.get_string(keys::ERROR_STORE_INFO).await?,
            mailchimp_list: self.get_string(keys::ERROR_MAILCHIMP_LIST).await?,
        })
    }
}
