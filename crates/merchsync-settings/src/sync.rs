// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store sync: create-or-update the remote store so it mirrors local settings.

use merchsync_core::types::{Address, CommerceStore};
use merchsync_core::{CommerceApi, MerchsyncError, OptionStore};
use tracing::{info, warn};

use crate::SiteIdentity;
use crate::record::SettingsRecord;
use crate::state::StateAccess;

const DEFAULT_LOCALE: &str = "en";
const DEFAULT_TIMEZONE: &str = "America/New_York";
const DEFAULT_CURRENCY: &str = "USD";

/// Build the address sub-object from store-info fields.
///
/// Empty components are omitted entirely; the remote API must never see
/// empty strings for optional address fields.
pub fn address_from(data: &SettingsRecord) -> Address {
    Address {
        address1: data.store_street.clone(),
        address2: None,
        city: data.store_city.clone(),
        province: data.store_state.clone(),
        postal_code: data.store_postal_code.clone(),
        country: data.store_country.clone(),
        country_code: None,
        company: data.store_name.clone(),
        phone: data.store_phone.clone(),
    }
}

/// Build the remote store payload from the merged settings.
pub fn build_store(site: &SiteIdentity, data: &SettingsRecord) -> CommerceStore {
    let address = address_from(data);
    CommerceStore {
        // The site's canonical URL doubles as the remote store id.
        id: site.url.clone(),
        list_id: data.mailchimp_list.clone().unwrap_or_default(),
        name: data.store_name.clone().unwrap_or_default(),
        platform: site.platform.clone(),
        domain: site.url.clone(),
        email_address: data.campaign_from_email.clone().unwrap_or_default(),
        currency_code: data
            .store_currency_code
            .clone()
            .unwrap_or_else(|| DEFAULT_CURRENCY.into()),
        primary_locale: Some(
            data.store_locale
                .clone()
                .unwrap_or_else(|| DEFAULT_LOCALE.into()),
        ),
        timezone: Some(
            data.store_timezone
                .clone()
                .unwrap_or_else(|| DEFAULT_TIMEZONE.into()),
        ),
        phone: data.store_phone.clone(),
        address: (!address.is_empty()).then_some(address),
    }
}

/// Push the merged settings to the remote store, creating it when absent.
///
/// Synchronous from the caller's point of view: blocks the validating
/// request until the remote call returns. Failures are recorded under the
/// store-info error flag and reported as `Ok(false)`; only local storage
/// failures propagate.
pub async fn sync_store<A, S>(
    api: &A,
    store: &S,
    site: &SiteIdentity,
    data: &SettingsRecord,
) -> Result<bool, MerchsyncError>
where
    A: CommerceApi + ?Sized,
    S: OptionStore + ?Sized,
{
    let state = StateAccess::new(store);

    let existing = match api.get_store(&site.url).await {
        Ok(existing) => existing,
        Err(e) => {
            warn!(error = %e, "remote store lookup failed");
            state.record_store_error(&e.to_string()).await?;
            return Ok(false);
        }
    };

    let new = existing.is_none();
    let payload = build_store(site, data);

    let result = if new {
        api.add_store(&payload).await
    } else {
        api.update_store(&payload).await
    };

    match result {
        Ok(()) => {
            state.clear_store_error().await?;
            state
                .stamp_store_synced(new, chrono::Utc::now().timestamp())
                .await?;
            info!(store_id = %payload.id, new, "remote store synced");
            Ok(true)
        }
        Err(e) => {
            warn!(error = %e, new, "remote store sync failed");
            state.record_store_error(&e.to_string()).await?;
            Ok(false)
        }
    }
}
