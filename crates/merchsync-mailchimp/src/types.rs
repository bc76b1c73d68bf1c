// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Mailchimp Marketing API.
//!
//! Request payloads (list submissions, store objects) live in
//! `merchsync-core::types` because they cross the `CommerceApi` trait
//! boundary; this module only carries response envelopes and the error body.

use merchsync_core::types::{CartSummary, MailingList, OrderSummary, ProductSummary};
use serde::Deserialize;

/// Problem-detail body returned on API errors.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProblem {
    pub title: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub status: u16,
}

/// Response body of `GET /ping`.
#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    pub health_status: String,
}

/// Envelope of `GET /lists`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListsEnvelope {
    pub lists: Vec<MailingList>,
    pub total_items: u64,
}

/// Envelope of `GET /ecommerce/stores/{id}/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersEnvelope {
    pub orders: Vec<OrderSummary>,
    pub total_items: u64,
}

/// Envelope of `GET /ecommerce/stores/{id}/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsEnvelope {
    pub products: Vec<ProductSummary>,
    pub total_items: u64,
}

/// Envelope of `GET /ecommerce/stores/{id}/carts`.
#[derive(Debug, Clone, Deserialize)]
pub struct CartsEnvelope {
    pub carts: Vec<CartSummary>,
    pub total_items: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_problem_tolerates_missing_detail() {
        let body = r#"{"title": "API Key Invalid"}"#;
        let problem: ApiProblem = serde_json::from_str(body).unwrap();
        assert_eq!(problem.title, "API Key Invalid");
        assert!(problem.detail.is_empty());
    }

    #[test]
    fn lists_envelope_ignores_extra_fields() {
        let body = r#"{
            "lists": [{"id": "abc123", "name": "Newsletter", "web_id": 9}],
            "total_items": 1,
            "_links": []
        }"#;
        let envelope: ListsEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.lists.len(), 1);
        assert_eq!(envelope.lists[0].id, "abc123");
        assert_eq!(envelope.total_items, 1);
    }
}
