// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the merchsync service.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Api,
    Storage,
}

// --- Remote entity types ---

/// A physical address attached to a list contact or a commerce store.
///
/// Empty components are omitted from the wire payload entirely; the remote
/// API treats an empty string differently from an absent field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Address {
    /// True when no component is set.
    pub fn is_empty(&self) -> bool {
        self.address1.is_none()
            && self.address2.is_none()
            && self.city.is_none()
            && self.province.is_none()
            && self.postal_code.is_none()
            && self.country.is_none()
            && self.country_code.is_none()
            && self.company.is_none()
            && self.phone.is_none()
    }
}

/// Default sender settings applied to campaigns created from a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignDefaults {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub language: String,
}

/// Submission payload for creating a new audience list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSubmission {
    pub name: String,
    pub contact: Address,
    pub permission_reminder: String,
    /// Let subscribers choose between HTML and plain-text email.
    pub email_type_option: bool,
    pub campaign_defaults: CampaignDefaults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_on_subscribe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_on_unsubscribe: Option<String>,
}

/// An audience list as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailingList {
    /// Opaque list identifier assigned by the remote API.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
}

/// The remote representation of a connected e-commerce store.
///
/// Keyed by the site's canonical URL; `list_id` links the store to an
/// audience list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommerceStore {
    pub id: String,
    pub list_id: String,
    pub name: String,
    pub platform: String,
    pub domain: String,
    pub email_address: String,
    pub currency_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// One page of a remote collection listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total_items: u64,
}

/// An order attached to a commerce store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_total: Option<f64>,
}

/// A product attached to a commerce store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
}

/// An abandoned cart attached to a commerce store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_total: Option<f64>,
}

// --- Background job types ---

/// A serializable unit of background sync work.
///
/// Jobs are enqueued by the settings orchestrator (or the debug surface) and
/// executed at-least-once by the sync worker, outside the request cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncJob {
    /// Full product catalog sync.
    Products,
    /// Full order history sync.
    Orders,
    /// Push a single order by id.
    SingleOrder { order_id: String },
}

/// A row in the persistent job queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: i64,
    pub queue_name: String,
    pub payload: String,
    pub status: String,
    pub attempts: i32,
    pub max_attempts: i32,
    pub created_at: String,
    pub updated_at: String,
    pub locked_until: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_omits_empty_components() {
        let address = Address {
            address1: Some("123 Main St".into()),
            city: Some("Atlanta".into()),
            ..Address::default()
        };
        let json = serde_json::to_string(&address).unwrap();
        assert!(json.contains("address1"));
        assert!(!json.contains("postal_code"));
        assert!(!json.contains("phone"));
    }

    #[test]
    fn empty_address_detected() {
        assert!(Address::default().is_empty());
        let with_city = Address {
            city: Some("Atlanta".into()),
            ..Address::default()
        };
        assert!(!with_city.is_empty());
    }

    #[test]
    fn sync_job_round_trips_through_json() {
        let job = SyncJob::SingleOrder {
            order_id: "order-77".into(),
        };
        let payload = serde_json::to_string(&job).unwrap();
        assert!(payload.contains("single_order"));
        let parsed: SyncJob = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed, job);
    }

    #[test]
    fn commerce_store_omits_unset_optionals() {
        let store = CommerceStore {
            id: "https://shop.example.com".into(),
            list_id: "abc123".into(),
            name: "Example Shop".into(),
            platform: "merchsync".into(),
            domain: "https://shop.example.com".into(),
            email_address: "owner@example.com".into(),
            currency_code: "USD".into(),
            ..CommerceStore::default()
        };
        let json = serde_json::to_string(&store).unwrap();
        assert!(!json.contains("timezone"));
        assert!(!json.contains("primary_locale"));
    }
}
