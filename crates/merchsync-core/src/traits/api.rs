// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote commerce API seam consumed by the settings orchestrator.
//!
//! The orchestrator never talks to the Mailchimp wire client directly; it
//! goes through [`CommerceApi`] so validation logic can be exercised against
//! a mock, and through [`CommerceApiConnector`] so a client can be built
//! from a key submitted in the current request rather than the stored one.

use async_trait::async_trait;

use crate::error::MerchsyncError;
use crate::types::{
    CartSummary, CommerceStore, ListSubmission, MailingList, OrderSummary, Paged, ProductSummary,
};

/// Authenticated operations against the remote marketing API.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Lightweight credential check. `Ok(())` means the key is live.
    async fn ping(&self) -> Result<(), MerchsyncError>;

    /// All audience lists visible to the account.
    async fn get_lists(&self) -> Result<Vec<MailingList>, MerchsyncError>;

    /// Whether the given list id names a real list.
    async fn has_list(&self, list_id: &str) -> Result<bool, MerchsyncError>;

    /// Create a new audience list. Errors with [`MerchsyncError::Api`] on a
    /// remote-reported failure.
    async fn create_list(&self, submission: &ListSubmission)
        -> Result<MailingList, MerchsyncError>;

    async fn delete_list(&self, list_id: &str) -> Result<(), MerchsyncError>;

    /// The commerce store registered under the given id, if any.
    async fn get_store(&self, store_id: &str) -> Result<Option<CommerceStore>, MerchsyncError>;

    async fn add_store(&self, store: &CommerceStore) -> Result<(), MerchsyncError>;

    async fn update_store(&self, store: &CommerceStore) -> Result<(), MerchsyncError>;

    async fn delete_store(&self, store_id: &str) -> Result<(), MerchsyncError>;

    async fn orders(
        &self,
        store_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Paged<OrderSummary>, MerchsyncError>;

    async fn products(
        &self,
        store_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Paged<ProductSummary>, MerchsyncError>;

    async fn carts(
        &self,
        store_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Paged<CartSummary>, MerchsyncError>;

    async fn delete_store_order(
        &self,
        store_id: &str,
        order_id: &str,
    ) -> Result<(), MerchsyncError>;

    async fn delete_cart(&self, store_id: &str, cart_id: &str) -> Result<(), MerchsyncError>;
}

/// Builds a [`CommerceApi`] client for a given API key.
///
/// A key is validated by building a throwaway client for it and pinging; the
/// connector is the seam that makes that possible without the orchestrator
/// knowing how clients are constructed.
pub trait CommerceApiConnector: Send + Sync + 'static {
    type Api: CommerceApi;

    /// Construct a client for the given key. A malformed key is an error
    /// here; an unauthorized key only fails at `ping` time.
    fn connect(&self, api_key: &str) -> Result<Self::Api, MerchsyncError>;
}
