// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mailchimp Marketing API adapter implementing [`CommerceApi`].
//!
//! The settings orchestrator consumes the [`CommerceApi`] trait; this crate
//! provides the real implementation over HTTP plus the connector used to
//! build clients from submitted or stored API keys.

pub mod client;
pub mod types;

use async_trait::async_trait;

use merchsync_core::types::{
    AdapterType, CartSummary, CommerceStore, HealthStatus, ListSubmission, MailingList,
    OrderSummary, Paged, ProductSummary,
};
use merchsync_core::{CommerceApi, CommerceApiConnector, MerchsyncError, ServiceAdapter};

pub use client::MailchimpClient;

/// Builds [`MailchimpClient`] instances, carrying the configured base URL
/// override so every client (stored key or submitted key) talks to the same
/// host.
#[derive(Debug, Clone, Default)]
pub struct MailchimpConnector {
    api_base: Option<String>,
}

impl MailchimpConnector {
    pub fn new(api_base: Option<String>) -> Self {
        Self { api_base }
    }
}

impl CommerceApiConnector for MailchimpConnector {
    type Api = MailchimpClient;

    fn connect(&self, api_key: &str) -> Result<MailchimpClient, MerchsyncError> {
        MailchimpClient::new(api_key, self.api_base.as_deref())
    }
}

#[async_trait]
impl ServiceAdapter for MailchimpClient {
    fn name(&self) -> &str {
        "mailchimp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Api
    }

    async fn health_check(&self) -> Result<HealthStatus, MerchsyncError> {
        match self.ping().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), MerchsyncError> {
        Ok(())
    }
}

#[async_trait]
impl CommerceApi for MailchimpClient {
    async fn ping(&self) -> Result<(), MerchsyncError> {
        MailchimpClient::ping(self).await
    }

    async fn get_lists(&self) -> Result<Vec<MailingList>, MerchsyncError> {
        MailchimpClient::get_lists(self).await
    }

    async fn has_list(&self, list_id: &str) -> Result<bool, MerchsyncError> {
        MailchimpClient::has_list(self, list_id).await
    }

    async fn create_list(
        &self,
        submission: &ListSubmission,
    ) -> Result<MailingList, MerchsyncError> {
        MailchimpClient::create_list(self, submission).await
    }

    async fn delete_list(&self, list_id: &str) -> Result<(), MerchsyncError> {
        MailchimpClient::delete_list(self, list_id).await
    }

    async fn get_store(&self, store_id: &str) -> Result<Option<CommerceStore>, MerchsyncError> {
        MailchimpClient::get_store(self, store_id).await
    }

    async fn add_store(&self, store: &CommerceStore) -> Result<(), MerchsyncError> {
        MailchimpClient::add_store(self, store).await
    }

    async fn update_store(&self, store: &CommerceStore) -> Result<(), MerchsyncError> {
        MailchimpClient::update_store(self, store).await
    }

    async fn delete_store(&self, store_id: &str) -> Result<(), MerchsyncError> {
        MailchimpClient::delete_store(self, store_id).await
    }

    async fn orders(
        &self,
        store_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Paged<OrderSummary>, MerchsyncError> {
        MailchimpClient::orders(self, store_id, page, limit).await
    }

    async fn products(
        &self,
        store_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Paged<ProductSummary>, MerchsyncError> {
        MailchimpClient::products(self, store_id, page, limit).await
    }

    async fn carts(
        &self,
        store_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Paged<CartSummary>, MerchsyncError> {
        MailchimpClient::carts(self, store_id, page, limit).await
    }

    async fn delete_store_order(
        &self,
        store_id: &str,
        order_id: &str,
    ) -> Result<(), MerchsyncError> {
        MailchimpClient::delete_store_order(self, store_id, order_id).await
    }

    async fn delete_cart(&self, store_id: &str, cart_id: &str) -> Result<(), MerchsyncError> {
        MailchimpClient::delete_cart(self, store_id, cart_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_rejects_malformed_key_without_override() {
        let connector = MailchimpConnector::default();
        assert!(connector.connect("no-suffix-").is_err());
    }

    #[test]
    fn connector_accepts_any_key_with_override() {
        let connector = MailchimpConnector::new(Some("http://127.0.0.1:9".into()));
        assert!(connector.connect("whatever").is_ok());
    }
}
