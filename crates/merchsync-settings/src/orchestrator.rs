// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The settings orchestrator: per-tab validation, dispatch, and side effects.
//!
//! One submission carries one tab's fields plus the hidden tab
//! discriminator. The orchestrator validates that tab, records the outcome
//! flag, runs the tab's side effects (list creation, store sync, first-time
//! job enqueue), and returns the submitted fields merged over the current
//! record. Remote failures are absorbed into error flags; only local
//! storage failures surface as errors.

use merchsync_core::types::SyncJob;
use merchsync_core::{
    CommerceApi, CommerceApiConnector, JobQueue, MerchsyncError, OptionStore,
};
use tracing::{debug, info, warn};

use crate::lists;
use crate::record::SettingsRecord;
use crate::state::{StateAccess, keys};
use crate::sync;
use crate::tabs::{FormInput, SettingsTab};

/// Identity of the storefront this service fronts.
///
/// Mirrors the `[site]` config section; the URL doubles as the remote
/// store id.
#[derive(Debug, Clone)]
pub struct SiteIdentity {
    pub name: String,
    pub url: String,
    pub platform: String,
}

/// Validates tabbed settings submissions and drives their side effects.
pub struct SettingsOrchestrator<C, S, Q>
where
    C: CommerceApiConnector,
    S: OptionStore,
    Q: JobQueue,
{
    connector: C,
    store: S,
    queue: Q,
    site: SiteIdentity,
}

impl<C, S, Q> SettingsOrchestrator<C, S, Q>
where
    C: CommerceApiConnector,
    S: OptionStore,
    Q: JobQueue,
{
    pub fn new(connector: C, store: S, queue: Q, site: SiteIdentity) -> Self {
        Self {
            connector,
            store,
            queue,
            site,
        }
    }

    pub fn site(&self) -> &SiteIdentity {
        &self.site
    }

    pub fn options(&self) -> &S {
        &self.store
    }

    /// The current persisted settings record.
    pub async fn load_settings(&self) -> Result<SettingsRecord, MerchsyncError> {
        match self.store.get(keys::SETTINGS).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| MerchsyncError::Storage {
                    source: Box::new(e),
                })
            }
            None => Ok(SettingsRecord::default()),
        }
    }

    /// Persist a settings record.
    pub async fn commit(&self, record: &SettingsRecord) -> Result<(), MerchsyncError> {
        let value = serde_json::to_value(record).map_err(|e| MerchsyncError::Storage {
            source: Box::new(e),
        })?;
        self.store.set(keys::SETTINGS, value).await
    }

    /// Validate one tab submission and return the merged record.
    ///
    /// An absent or unrecognized tab returns the current record unchanged:
    /// no flags written, no remote calls made. The returned record is not
    /// persisted; see [`Self::handle_submission`].
    pub async fn validate(&self, input: &FormInput) -> Result<SettingsRecord, MerchsyncError> {
        let current = self.load_settings().await?;

        let Some(tab) = SettingsTab::from_input(input) else {
            debug!("no recognized tab in submission, returning record unchanged");
            return Ok(current);
        };

        let patch = match tab {
            SettingsTab::ApiKey => self.validate_api_key(input).await?,
            SettingsTab::StoreInfo => self.validate_store_info(&current, input).await?,
            SettingsTab::CampaignDefaults => self.validate_campaign_defaults(input).await?,
            SettingsTab::NewsletterSettings => {
                self.validate_newsletter_settings(&current, input).await?
            }
        };

        Ok(current.merge(patch))
    }

    /// Validate, persist, and return the merged record.
    pub async fn handle_submission(
        &self,
        input: &FormInput,
    ) -> Result<SettingsRecord, MerchsyncError> {
        let merged = self.validate(input).await?;
        self.commit(&merged).await?;
        Ok(merged)
    }

    /// A client for the stored API key, when one exists and can be built.
    ///
    /// The debug surface uses this to hit the remote API directly.
    pub async fn stored_api(&self) -> Result<Option<C::Api>, MerchsyncError> {
        let record = self.load_settings().await?;
        Ok(self.api_for(&record))
    }

    /// A client for the record's stored API key, when one can be built.
    pub(crate) fn api_for(&self, record: &SettingsRecord) -> Option<C::Api> {
        let key = record.mailchimp_api_key.as_deref()?;
        match self.connector.connect(key) {
            Ok(api) => Some(api),
            Err(e) => {
                warn!(error = %e, "stored API key cannot build a client");
                None
            }
        }
    }

    /// The api_key tab: accept the key only if a live ping succeeds.
    async fn validate_api_key(
        &self,
        input: &FormInput,
    ) -> Result<SettingsRecord, MerchsyncError> {
        let mut patch = SettingsTab::ApiKey.extract(input, &self.site);

        let valid = match patch.mailchimp_api_key.as_deref() {
            Some(key) => match self.connector.connect(key) {
                Ok(api) => api.ping().await.is_ok(),
                Err(e) => {
                    debug!(error = %e, "submitted API key rejected before ping");
                    false
                }
            },
            None => false,
        };

        if !valid {
            patch.mailchimp_api_key = None;
        }

        // Tell the admin surface whether we had a valid ping.
        StateAccess::new(&self.store).set_api_ping_valid(valid).await?;

        Ok(patch)
    }

    /// The store_info tab: all ten fields or nothing; a valid linked list
    /// triggers an immediate store sync.
    async fn validate_store_info(
        &self,
        current: &SettingsRecord,
        input: &FormInput,
    ) -> Result<SettingsRecord, MerchsyncError> {
        let patch = SettingsTab::StoreInfo.extract(input, &self.site);
        let state = StateAccess::new(&self.store);

        if !patch.has_valid_store_info() {
            state.set_store_info_valid(false).await?;
            return Ok(SettingsRecord::default());
        }

        state.set_store_info_valid(true).await?;

        if self.has_valid_list(current).await? {
            if let Some(api) = self.api_for(current) {
                let merged = current.merge(patch.clone());
                sync::sync_store(&api, &self.store, &self.site, &merged).await?;
            }
        }

        Ok(patch)
    }

    /// The campaign_defaults tab: all five fields or nothing.
    async fn validate_campaign_defaults(
        &self,
        input: &FormInput,
    ) -> Result<SettingsRecord, MerchsyncError> {
        let patch = SettingsTab::CampaignDefaults.extract(input, &self.site);
        let state = StateAccess::new(&self.store);

        if !patch.has_valid_campaign_defaults() {
            state.set_campaign_defaults_valid(false).await?;
            return Ok(SettingsRecord::default());
        }

        state.set_campaign_defaults_valid(true).await?;
        Ok(patch)
    }

    /// The newsletter_settings tab: resolve `create_new`, then sync the
    /// store and enqueue the first background sync when a confirmed list
    /// exists.
    async fn validate_newsletter_settings(
        &self,
        current: &SettingsRecord,
        input: &FormInput,
    ) -> Result<SettingsRecord, MerchsyncError> {
        let mut patch = SettingsTab::NewsletterSettings.extract(input, &self.site);

        if patch.mailchimp_list.as_deref() == Some("create_new") {
            let merged = current.merge(patch.clone());
            let api = self.api_for(current);
            patch.mailchimp_list =
                lists::create_list(api.as_ref(), &self.store, &merged).await?;
        }

        // As long as this submission carries a list the remote side
        // confirms, sync the store now.
        let confirmed_list = match patch.mailchimp_list.as_deref().filter(|id| !id.is_empty()) {
            Some(list_id) => match self.api_for(current) {
                Some(api) => match api.has_list(list_id).await {
                    Ok(found) => found.then(|| list_id.to_string()),
                    Err(e) => {
                        warn!(error = %e, list_id, "list confirmation failed");
                        None
                    }
                },
                None => None,
            },
            None => None,
        };

        if let Some(list_id) = confirmed_list {
            if let Some(api) = self.api_for(current) {
                let merged = current.merge(patch.clone());
                sync::sync_store(&api, &self.store, &self.site, &merged).await?;
            }

            // Start the background sync the first time a list is wired up.
            let state = StateAccess::new(&self.store);
            if state
                .flag_sync_started(chrono::Utc::now().timestamp())
                .await?
            {
                let job_id = self.queue.enqueue(&SyncJob::Products).await?;
                info!(job_id, list_id = %list_id, "initial product sync enqueued");
            }
        }

        Ok(patch)
    }
}
