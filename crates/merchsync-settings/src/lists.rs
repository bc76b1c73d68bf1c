// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! List creation for the "create a new list" newsletter option.

use merchsync_core::types::{CampaignDefaults, ListSubmission};
use merchsync_core::{CommerceApi, MerchsyncError, OptionStore};
use tracing::{info, warn};

use crate::record::SettingsRecord;
use crate::state::StateAccess;
use crate::sync::address_from;

/// Recorded when creation is attempted before enough settings exist.
const MISSING_FIELDS_ERROR: &str = "missing required fields for list creation";

/// Build the list-creation submission from merged settings.
///
/// Returns `None` unless all ten required fields (store identity plus
/// campaign defaults) are present. The campaign language is the one field
/// allowed to default here, since older records may predate it.
pub fn build_list_submission(data: &SettingsRecord) -> Option<ListSubmission> {
    let required = [
        &data.store_name,
        &data.store_street,
        &data.store_city,
        &data.store_state,
        &data.store_postal_code,
        &data.store_country,
        &data.campaign_from_name,
        &data.campaign_from_email,
        &data.campaign_subject,
        &data.campaign_permission_reminder,
    ];
    if required.iter().any(|field| field.is_none()) {
        return None;
    }

    Some(ListSubmission {
        name: data.store_name.clone()?,
        contact: address_from(data),
        permission_reminder: data.campaign_permission_reminder.clone()?,
        // Let subscribers choose preferred email type (html or text).
        email_type_option: true,
        campaign_defaults: CampaignDefaults {
            from_name: data.campaign_from_name.clone()?,
            from_email: data.campaign_from_email.clone()?,
            subject: data.campaign_subject.clone()?,
            language: data.campaign_language.clone().unwrap_or_else(|| "en".into()),
        },
        notify_on_subscribe: data.notify_on_subscribe.clone(),
        notify_on_unsubscribe: data.notify_on_unsubscribe.clone(),
    })
}

/// Create a new remote list from the merged settings.
///
/// Returns the new list id, or `None` when preconditions are unmet or the
/// remote call fails; either way the outcome is recorded under the list
/// error flag so the admin surface can explain itself. Only local storage
/// failures propagate.
pub async fn create_list<A, S>(
    api: Option<&A>,
    store: &S,
    data: &SettingsRecord,
) -> Result<Option<String>, MerchsyncError>
where
    A: CommerceApi + ?Sized,
    S: OptionStore + ?Sized,
{
    let state = StateAccess::new(store);

    let Some(submission) = build_list_submission(data) else {
        state.record_list_error(MISSING_FIELDS_ERROR).await?;
        return Ok(None);
    };

    let Some(api) = api else {
        state.record_list_error("no valid API key configured").await?;
        return Ok(None);
    };

    match api.create_list(&submission).await {
        Ok(list) => {
            state.clear_list_error().await?;
            info!(list_id = %list.id, "audience list created");
            Ok(Some(list.id))
        }
        Err(e) => {
            warn!(error = %e, "audience list creation failed");
            state.record_list_error(&e.to_string()).await?;
            Ok(None)
        }
    }
}
