// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persisted settings record.
//!
//! A flat mapping of named fields, namespaced by the tab that validates
//! them. A field is present only if it passed its tab's validation; blank
//! input is dropped at extraction time, so the record never holds empty
//! strings.

use serde::{Deserialize, Serialize};

/// All fields the tabbed settings form can persist.
///
/// Also used as a patch: each tab's validation produces a record holding
/// only that tab's accepted fields, merged over the current record with
/// [`SettingsRecord::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsRecord {
    // api_key tab
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailchimp_api_key: Option<String>,

    // store_info tab
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_currency_code: Option<String>,

    // campaign_defaults tab
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_from_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_from_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_permission_reminder: Option<String>,

    // newsletter_settings tab
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailchimp_list: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newsletter_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_on_subscribe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_on_unsubscribe: Option<String>,
}

impl SettingsRecord {
    /// Union of `self` and `patch`, with patch values winning on collision.
    ///
    /// An empty patch returns `self` unchanged; a failed tab submission is a
    /// no-op, never a partial wipe.
    pub fn merge(&self, patch: SettingsRecord) -> SettingsRecord {
        SettingsRecord {
            mailchimp_api_key: patch.mailchimp_api_key.or_else(|| self.mailchimp_api_key.clone()),
            store_name: patch.store_name.or_else(|| self.store_name.clone()),
            store_street: patch.store_street.or_else(|| self.store_street.clone()),
            store_city: patch.store_city.or_else(|| self.store_city.clone()),
            store_state: patch.store_state.or_else(|| self.store_state.clone()),
            store_postal_code: patch
                .store_postal_code
                .or_else(|| self.store_postal_code.clone()),
            store_country: patch.store_country.or_else(|| self.store_country.clone()),
            store_phone: patch.store_phone.or_else(|| self.store_phone.clone()),
            store_locale: patch.store_locale.or_else(|| self.store_locale.clone()),
            store_timezone: patch.store_timezone.or_else(|| self.store_timezone.clone()),
            store_currency_code: patch
                .store_currency_code
                .or_else(|| self.store_currency_code.clone()),
            campaign_from_name: patch
                .campaign_from_name
                .or_else(|| self.campaign_from_name.clone()),
            campaign_from_email: patch
                .campaign_from_email
                .or_else(|| self.campaign_from_email.clone()),
            campaign_subject: patch.campaign_subject.or_else(|| self.campaign_subject.clone()),
            campaign_language: patch
                .campaign_language
                .or_else(|| self.campaign_language.clone()),
            campaign_permission_reminder: patch
                .campaign_permission_reminder
                .or_else(|| self.campaign_permission_reminder.clone()),
            mailchimp_list: patch.mailchimp_list.or_else(|| self.mailchimp_list.clone()),
            newsletter_label: patch.newsletter_label.or_else(|| self.newsletter_label.clone()),
            notify_on_subscribe: patch
                .notify_on_subscribe
                .or_else(|| self.notify_on_subscribe.clone()),
            notify_on_unsubscribe: patch
                .notify_on_unsubscribe
                .or_else(|| self.notify_on_unsubscribe.clone()),
        }
    }

    /// All ten store-info fields present.
    pub fn has_valid_store_info(&self) -> bool {
        self.store_name.is_some()
            && self.store_street.is_some()
            && self.store_city.is_some()
            && self.store_state.is_some()
            && self.store_postal_code.is_some()
            && self.store_country.is_some()
            && self.store_phone.is_some()
            && self.store_locale.is_some()
            && self.store_timezone.is_some()
            && self.store_currency_code.is_some()
    }

    /// All five campaign-defaults fields present.
    pub fn has_valid_campaign_defaults(&self) -> bool {
        self.campaign_from_name.is_some()
            && self.campaign_from_email.is_some()
            && self.campaign_subject.is_some()
            && self.campaign_language.is_some()
            && self.campaign_permission_reminder.is_some()
    }

    /// The configured list id, if non-empty.
    pub fn list_id(&self) -> Option<&str> {
        self.mailchimp_list.as_deref().filter(|id| !id.is_empty())
    }
}
