// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings tabs and per-tab field extraction.
//!
//! Extraction never fails: absent optional fields fall back to a
//! type-appropriate default, malformed values (bad email addresses) and
//! blank strings are simply dropped. Whether the resulting patch is
//! acceptable is decided afterwards by the orchestrator's validation pass.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use strum::EnumString;

use crate::SiteIdentity;
use crate::record::SettingsRecord;

/// Hidden form field carrying the submitted tab's name.
pub const ACTIVE_TAB_FIELD: &str = "mailchimp_active_tab";

/// Default label shown next to the newsletter opt-in checkbox.
const DEFAULT_NEWSLETTER_LABEL: &str = "Subscribe to our newsletter";

/// Raw form input: one flat set of string fields.
pub type FormInput = BTreeMap<String, String>;

/// The discrete sections of the settings form.
///
/// Dispatch past the string boundary is an exhaustive match on this enum;
/// an unrecognized tab name fails to parse and the submission is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SettingsTab {
    ApiKey,
    StoreInfo,
    CampaignDefaults,
    NewsletterSettings,
}

impl SettingsTab {
    /// The tab named by the submission's hidden discriminator field, if any.
    pub fn from_input(input: &FormInput) -> Option<Self> {
        input.get(ACTIVE_TAB_FIELD)?.parse().ok()
    }

    /// Extract this tab's candidate fields from raw input.
    pub fn extract(&self, input: &FormInput, site: &SiteIdentity) -> SettingsRecord {
        match self {
            SettingsTab::ApiKey => extract_api_key(input),
            SettingsTab::StoreInfo => extract_store_info(input, site),
            SettingsTab::CampaignDefaults => extract_campaign_defaults(input, site),
            SettingsTab::NewsletterSettings => extract_newsletter_settings(input),
        }
    }
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Syntactic email check, the same gate the original form applied.
pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// The field's trimmed value, or `None` when absent or blank.
fn non_empty(input: &FormInput, key: &str) -> Option<String> {
    input
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The field's value when it parses as an email address, `None` otherwise.
fn valid_email(input: &FormInput, key: &str) -> Option<String> {
    non_empty(input, key).filter(|v| is_email(v))
}

fn extract_api_key(input: &FormInput) -> SettingsRecord {
    SettingsRecord {
        mailchimp_api_key: non_empty(input, "mailchimp_api_key"),
        ..SettingsRecord::default()
    }
}

fn extract_store_info(input: &FormInput, site: &SiteIdentity) -> SettingsRecord {
    SettingsRecord {
        // store basics
        store_name: non_empty(input, "store_name").or_else(|| Some(site.name.clone())),
        store_street: non_empty(input, "store_street"),
        store_city: non_empty(input, "store_city"),
        store_state: non_empty(input, "store_state"),
        store_postal_code: non_empty(input, "store_postal_code"),
        store_country: non_empty(input, "store_country"),
        store_phone: non_empty(input, "store_phone"),

        // locale info
        store_locale: non_empty(input, "store_locale"),
        store_timezone: non_empty(input, "store_timezone"),
        store_currency_code: non_empty(input, "store_currency_code"),
        ..SettingsRecord::default()
    }
}

fn extract_campaign_defaults(input: &FormInput, site: &SiteIdentity) -> SettingsRecord {
    SettingsRecord {
        campaign_from_name: non_empty(input, "campaign_from_name"),
        campaign_from_email: valid_email(input, "campaign_from_email"),
        campaign_subject: non_empty(input, "campaign_subject").or_else(|| Some(site.name.clone())),
        campaign_language: non_empty(input, "campaign_language").or_else(|| Some("en".into())),
        campaign_permission_reminder: non_empty(input, "campaign_permission_reminder")
            .or_else(|| {
                Some(format!(
                    "You were subscribed to the newsletter from {}",
                    site.name
                ))
            }),
        ..SettingsRecord::default()
    }
}

fn extract_newsletter_settings(input: &FormInput) -> SettingsRecord {
    SettingsRecord {
        mailchimp_list: non_empty(input, "mailchimp_list"),
        newsletter_label: non_empty(input, "newsletter_label")
            .or_else(|| Some(DEFAULT_NEWSLETTER_LABEL.into())),
        notify_on_subscribe: valid_email(input, "notify_on_subscribe"),
        notify_on_unsubscribe: valid_email(input, "notify_on_unsubscribe"),
        ..SettingsRecord::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteIdentity {
        SiteIdentity {
            name: "Example Shop".into(),
            url: "https://shop.example.com".into(),
            platform: "merchsync".into(),
        }
    }

    fn input(pairs: &[(&str, &str)]) -> FormInput {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn tab_names_parse_from_snake_case() {
        assert_eq!("api_key".parse(), Ok(SettingsTab::ApiKey));
        assert_eq!("store_info".parse(), Ok(SettingsTab::StoreInfo));
        assert_eq!(
            "campaign_defaults".parse(),
            Ok(SettingsTab::CampaignDefaults)
        );
        assert_eq!(
            "newsletter_settings".parse(),
            Ok(SettingsTab::NewsletterSettings)
        );
        assert!("sync".parse::<SettingsTab>().is_err());
    }

    #[test]
    fn from_input_reads_discriminator_field() {
        let form = input(&[(ACTIVE_TAB_FIELD, "store_info")]);
        assert_eq!(SettingsTab::from_input(&form), Some(SettingsTab::StoreInfo));

        assert_eq!(SettingsTab::from_input(&FormInput::new()), None);

        let unknown = input(&[(ACTIVE_TAB_FIELD, "no_such_tab")]);
        assert_eq!(SettingsTab::from_input(&unknown), None);
    }

    #[test]
    fn blank_fields_are_dropped_not_kept_empty() {
        let form = input(&[("store_street", "   "), ("store_city", "")]);
        let patch = SettingsTab::StoreInfo.extract(&form, &site());
        assert!(patch.store_street.is_none());
        assert!(patch.store_city.is_none());
    }

    #[test]
    fn store_name_defaults_to_site_name() {
        let patch = SettingsTab::StoreInfo.extract(&FormInput::new(), &site());
        assert_eq!(patch.store_name.as_deref(), Some("Example Shop"));
        assert!(patch.store_street.is_none());
    }

    #[test]
    fn campaign_defaults_fall_back_per_field() {
        let form = input(&[("campaign_from_name", "Acme")]);
        let patch = SettingsTab::CampaignDefaults.extract(&form, &site());
        assert_eq!(patch.campaign_from_name.as_deref(), Some("Acme"));
        assert_eq!(patch.campaign_subject.as_deref(), Some("Example Shop"));
        assert_eq!(patch.campaign_language.as_deref(), Some("en"));
        assert_eq!(
            patch.campaign_permission_reminder.as_deref(),
            Some("You were subscribed to the newsletter from Example Shop")
        );
        // No email submitted: nothing to accept.
        assert!(patch.campaign_from_email.is_none());
    }

    #[test]
    fn malformed_from_email_is_dropped_at_extraction() {
        let form = input(&[
            ("campaign_from_email", "not-an-email"),
            ("campaign_from_name", "Acme"),
        ]);
        let patch = SettingsTab::CampaignDefaults.extract(&form, &site());
        assert!(patch.campaign_from_email.is_none());
    }

    #[test]
    fn newsletter_label_defaults_and_notify_emails_are_checked() {
        let form = input(&[
            ("mailchimp_list", "abc123"),
            ("notify_on_subscribe", "alerts@example.com"),
            ("notify_on_unsubscribe", "not an email"),
        ]);
        let patch = SettingsTab::NewsletterSettings.extract(&form, &site());
        assert_eq!(patch.mailchimp_list.as_deref(), Some("abc123"));
        assert_eq!(
            patch.newsletter_label.as_deref(),
            Some("Subscribe to our newsletter")
        );
        assert_eq!(
            patch.notify_on_subscribe.as_deref(),
            Some("alerts@example.com")
        );
        assert!(patch.notify_on_unsubscribe.is_none());
    }

    #[test]
    fn email_check_accepts_plausible_addresses_only() {
        assert!(is_email("owner@example.com"));
        assert!(is_email("first.last+tag@shop.co.uk"));
        assert!(!is_email("owner@example"));
        assert!(!is_email("owner example.com"));
        assert!(!is_email("@example.com"));
    }
}
