// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Readiness checks and time-boxed cached lookups.
//!
//! Ping results and list listings are cached for 120 seconds, and only
//! successes are cached: a failed ping is reported but re-attempted on
//! every call until one succeeds.

use merchsync_core::types::MailingList;
use merchsync_core::{
    CommerceApi, CommerceApiConnector, JobQueue, MerchsyncError, OptionStore,
};
use tracing::{debug, warn};

use crate::orchestrator::SettingsOrchestrator;
use crate::record::SettingsRecord;
use crate::state::keys;

/// How long cached lookups stay fresh.
pub const CACHE_TTL_SECS: u64 = 120;

impl<C, S, Q> SettingsOrchestrator<C, S, Q>
where
    C: CommerceApiConnector,
    S: OptionStore,
    Q: JobQueue,
{
    /// True iff a key is stored and it pings, served from a 120s cache.
    pub async fn has_valid_api_key(&self) -> Result<bool, MerchsyncError> {
        let record = self.load_settings().await?;
        self.has_valid_api_key_for(&record).await
    }

    pub(crate) async fn has_valid_api_key_for(
        &self,
        record: &SettingsRecord,
    ) -> Result<bool, MerchsyncError> {
        if record.mailchimp_api_key.is_none() {
            return Ok(false);
        }

        if let Some(cached) = self.options().get_cached(keys::CACHE_PING).await? {
            return Ok(cached.as_bool().unwrap_or(false));
        }

        let Some(api) = self.api_for(record) else {
            return Ok(false);
        };

        match api.ping().await {
            Ok(()) => {
                self.options()
                    .set_cached(keys::CACHE_PING, serde_json::json!(true), CACHE_TTL_SECS)
                    .await?;
                Ok(true)
            }
            Err(e) => {
                // Failures are not cached; callers re-ping until success.
                debug!(error = %e, "credential ping failed");
                Ok(false)
            }
        }
    }

    /// True iff the record links a list the remote side confirms.
    pub async fn has_valid_list(
        &self,
        record: &SettingsRecord,
    ) -> Result<bool, MerchsyncError> {
        if !self.has_valid_api_key_for(record).await? {
            return Ok(false);
        }
        let Some(list_id) = record.list_id() else {
            return Ok(false);
        };
        let Some(api) = self.api_for(record) else {
            return Ok(false);
        };
        match api.has_list(list_id).await {
            Ok(found) => Ok(found),
            Err(e) => {
                warn!(error = %e, list_id, "list confirmation failed");
                Ok(false)
            }
        }
    }

    /// The account's audience lists, served from a 120s cache.
    ///
    /// Remote failures surface as an empty listing; the admin surface shows
    /// "no lists" rather than an error page.
    pub async fn get_lists(&self) -> Result<Vec<MailingList>, MerchsyncError> {
        let record = self.load_settings().await?;
        if !self.has_valid_api_key_for(&record).await? {
            return Ok(vec![]);
        }

        if let Some(cached) = self.options().get_cached(keys::CACHE_LISTS).await? {
            if let Ok(lists) = serde_json::from_value::<Vec<MailingList>>(cached) {
                return Ok(lists);
            }
        }

        let Some(api) = self.api_for(&record) else {
            return Ok(vec![]);
        };

        match api.get_lists().await {
            Ok(lists) => {
                if !lists.is_empty() {
                    let value =
                        serde_json::to_value(&lists).map_err(|e| MerchsyncError::Storage {
                            source: Box::new(e),
                        })?;
                    self.options()
                        .set_cached(keys::CACHE_LISTS, value, CACHE_TTL_SECS)
                        .await?;
                }
                Ok(lists)
            }
            Err(e) => {
                warn!(error = %e, "list fetch failed");
                Ok(vec![])
            }
        }
    }

    /// All four readiness checks: valid key, configured list, remote list
    /// confirmed, remote store present.
    pub async fn is_ready_for_sync(&self) -> Result<bool, MerchsyncError> {
        let record = self.load_settings().await?;

        if !self.has_valid_api_key_for(&record).await? {
            return Ok(false);
        }

        let Some(list_id) = record.list_id() else {
            return Ok(false);
        };

        let Some(api) = self.api_for(&record) else {
            return Ok(false);
        };

        match api.has_list(list_id).await {
            Ok(true) => {}
            Ok(false) => return Ok(false),
            Err(e) => {
                warn!(error = %e, "list confirmation failed");
                return Ok(false);
            }
        }

        match api.get_store(&self.site().url).await {
            Ok(Some(_)) => Ok(true),
            Ok(None) => Ok(false),
            Err(e) => {
                warn!(error = %e, "remote store lookup failed");
                Ok(false)
            }
        }
    }
}
