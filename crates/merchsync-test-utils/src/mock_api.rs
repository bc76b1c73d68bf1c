// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock commerce API for deterministic orchestrator testing.
//!
//! `MockCommerceApi` implements `CommerceApi` with scripted results and
//! per-operation call counters, enabling fast, CI-runnable tests without
//! external API calls. Clones share state, so a test can keep one handle
//! for assertions while the orchestrator owns another.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use merchsync_core::types::{
    CartSummary, CommerceStore, ListSubmission, MailingList, OrderSummary, Paged, ProductSummary,
};
use merchsync_core::{CommerceApi, CommerceApiConnector, MerchsyncError};

/// Per-operation call counts observed by the mock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiCallCounts {
    pub ping: usize,
    pub get_lists: usize,
    pub has_list: usize,
    pub create_list: usize,
    pub get_store: usize,
    pub add_store: usize,
    pub update_store: usize,
}

#[derive(Debug, Default)]
struct MockState {
    ping_ok: bool,
    lists: Vec<MailingList>,
    create_list_id: Option<String>,
    create_list_error: Option<String>,
    store: Option<CommerceStore>,
    store_error: Option<String>,
    added_stores: Vec<CommerceStore>,
    updated_stores: Vec<CommerceStore>,
    calls: ApiCallCounts,
}

/// A mock commerce API with scripted responses.
#[derive(Debug, Clone, Default)]
pub struct MockCommerceApi {
    state: Arc<Mutex<MockState>>,
}

impl MockCommerceApi {
    /// A mock whose ping succeeds and which knows no lists or stores.
    pub fn new() -> Self {
        let mock = Self::default();
        mock.set_ping_ok(true);
        mock
    }

    pub fn set_ping_ok(&self, ok: bool) {
        self.state.lock().unwrap().ping_ok = ok;
    }

    /// Register a list id the remote side will confirm via `has_list`.
    pub fn add_known_list(&self, id: &str, name: &str) {
        self.state.lock().unwrap().lists.push(MailingList {
            id: id.to_string(),
            name: name.to_string(),
            date_created: None,
        });
    }

    /// Script `create_list` to succeed with the given new id.
    pub fn set_create_list_id(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        state.create_list_id = Some(id.to_string());
        state.create_list_error = None;
    }

    /// Script `create_list` to fail with the given message.
    pub fn set_create_list_error(&self, message: &str) {
        let mut state = self.state.lock().unwrap();
        state.create_list_error = Some(message.to_string());
        state.create_list_id = None;
    }

    /// Script `get_store` to find an existing remote store.
    pub fn set_existing_store(&self, store: CommerceStore) {
        self.state.lock().unwrap().store = Some(store);
    }

    /// Script `add_store`/`update_store` to fail with the given message.
    pub fn set_store_error(&self, message: &str) {
        self.state.lock().unwrap().store_error = Some(message.to_string());
    }

    /// Call counts at this point in the test.
    pub fn calls(&self) -> ApiCallCounts {
        self.state.lock().unwrap().calls.clone()
    }

    /// Stores passed to `add_store`, in order.
    pub fn added_stores(&self) -> Vec<CommerceStore> {
        self.state.lock().unwrap().added_stores.clone()
    }

    /// Stores passed to `update_store`, in order.
    pub fn updated_stores(&self) -> Vec<CommerceStore> {
        self.state.lock().unwrap().updated_stores.clone()
    }
}

#[async_trait]
impl CommerceApi for MockCommerceApi {
    async fn ping(&self) -> Result<(), MerchsyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.ping += 1;
        if state.ping_ok {
            Ok(())
        } else {
            Err(MerchsyncError::api("API Key Invalid"))
        }
    }

    async fn get_lists(&self) -> Result<Vec<MailingList>, MerchsyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.get_lists += 1;
        Ok(state.lists.clone())
    }

    async fn has_list(&self, list_id: &str) -> Result<bool, MerchsyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.has_list += 1;
        Ok(state.lists.iter().any(|l| l.id == list_id))
    }

    async fn create_list(
        &self,
        submission: &ListSubmission,
    ) -> Result<MailingList, MerchsyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_list += 1;
        if let Some(message) = &state.create_list_error {
            return Err(MerchsyncError::api(message.clone()));
        }
        let id = state
            .create_list_id
            .clone()
            .unwrap_or_else(|| "mock-list".to_string());
        let list = MailingList {
            id: id.clone(),
            name: submission.name.clone(),
            date_created: None,
        };
        state.lists.push(list.clone());
        Ok(list)
    }

    async fn delete_list(&self, list_id: &str) -> Result<(), MerchsyncError> {
        let mut state = self.state.lock().unwrap();
        state.lists.retain(|l| l.id != list_id);
        Ok(())
    }

    async fn get_store(&self, _store_id: &str) -> Result<Option<CommerceStore>, MerchsyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.get_store += 1;
        Ok(state.store.clone())
    }

    async fn add_store(&self, store: &CommerceStore) -> Result<(), MerchsyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.add_store += 1;
        if let Some(message) = &state.store_error {
            return Err(MerchsyncError::api(message.clone()));
        }
        state.added_stores.push(store.clone());
        state.store = Some(store.clone());
        Ok(())
    }

    async fn update_store(&self, store: &CommerceStore) -> Result<(), MerchsyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.update_store += 1;
        if let Some(message) = &state.store_error {
            return Err(MerchsyncError::api(message.clone()));
        }
        state.updated_stores.push(store.clone());
        state.store = Some(store.clone());
        Ok(())
    }

    async fn delete_store(&self, _store_id: &str) -> Result<(), MerchsyncError> {
        self.state.lock().unwrap().store = None;
        Ok(())
    }

    async fn orders(
        &self,
        _store_id: &str,
        _page: u32,
        _limit: u32,
    ) -> Result<Paged<OrderSummary>, MerchsyncError> {
        Ok(Paged {
            items: vec![],
            total_items: 0,
        })
    }

    async fn products(
        &self,
        _store_id: &str,
        _page: u32,
        _limit: u32,
    ) -> Result<Paged<ProductSummary>, MerchsyncError> {
        Ok(Paged {
            items: vec![],
            total_items: 0,
        })
    }

    async fn carts(
        &self,
        _store_id: &str,
        _page: u32,
        _limit: u32,
    ) -> Result<Paged<CartSummary>, MerchsyncError> {
        Ok(Paged {
            items: vec![],
            total_items: 0,
        })
    }

    async fn delete_store_order(
        &self,
        _store_id: &str,
        _order_id: &str,
    ) -> Result<(), MerchsyncError> {
        Ok(())
    }

    async fn delete_cart(&self, _store_id: &str, _cart_id: &str) -> Result<(), MerchsyncError> {
        Ok(())
    }
}

/// Connector handing out clones of one shared [`MockCommerceApi`].
///
/// Records every key it was asked to connect with, so tests can assert a
/// submitted key (not the stored one) was used for a live ping.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    api: MockCommerceApi,
    connected_keys: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    pub fn new(api: MockCommerceApi) -> Self {
        Self {
            api,
            connected_keys: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn connected_keys(&self) -> Vec<String> {
        self.connected_keys.lock().unwrap().clone()
    }
}

impl CommerceApiConnector for MockConnector {
    type Api = MockCommerceApi;

    fn connect(&self, api_key: &str) -> Result<MockCommerceApi, MerchsyncError> {
        self.connected_keys
            .lock()
            .unwrap()
            .push(api_key.to_string());
        Ok(self.api.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ping_respects_script_and_counts() {
        let api = MockCommerceApi::new();
        assert!(api.ping().await.is_ok());

        api.set_ping_ok(false);
        assert!(api.ping().await.is_err());
        assert_eq!(api.calls().ping, 2);
    }

    #[tokio::test]
    async fn create_list_registers_the_new_list() {
        let api = MockCommerceApi::new();
        api.set_create_list_id("fresh-1");

        let submission = ListSubmission {
            name: "Shop".into(),
            contact: Default::default(),
            permission_reminder: "reminder".into(),
            email_type_option: true,
            campaign_defaults: Default::default(),
            notify_on_subscribe: None,
            notify_on_unsubscribe: None,
        };
        let list = api.create_list(&submission).await.unwrap();
        assert_eq!(list.id, "fresh-1");
        assert!(api.has_list("fresh-1").await.unwrap());
    }

    #[tokio::test]
    async fn connector_records_keys_and_shares_state() {
        let api = MockCommerceApi::new();
        let connector = MockConnector::new(api.clone());

        let handle = connector.connect("key-one").unwrap();
        handle.ping().await.unwrap();

        assert_eq!(connector.connected_keys(), vec!["key-one"]);
        assert_eq!(api.calls().ping, 1);
    }
}
