// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory option store with a manual clock.
//!
//! TTL behavior is driven by [`MemoryStore::advance`] rather than wall time,
//! so cache-expiry tests are deterministic and run in microseconds.

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;

use merchsync_core::{MerchsyncError, OptionStore};

#[derive(Debug, Default)]
struct StoreState {
    options: HashMap<String, serde_json::Value>,
    // key -> (value, absolute expiry in mock-clock seconds)
    cache: HashMap<String, (serde_json::Value, u64)>,
}

/// In-memory [`OptionStore`] double.
///
/// Clones share state; keep one handle in the test for assertions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
    clock: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the mock clock by `secs` seconds.
    pub fn advance(&self, secs: u64) {
        self.clock.fetch_add(secs, Ordering::SeqCst);
    }

    fn now(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }

    /// Synchronous peek for test assertions.
    pub fn peek(&self, path: &str) -> Option<serde_json::Value> {
        self.state.lock().unwrap().options.get(path).cloned()
    }
}

#[async_trait]
impl OptionStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<serde_json::Value>, MerchsyncError> {
        Ok(self.state.lock().unwrap().options.get(path).cloned())
    }

    async fn set(&self, path: &str, value: serde_json::Value) -> Result<(), MerchsyncError> {
        self.state
            .lock()
            .unwrap()
            .options
            .insert(path.to_string(), value);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), MerchsyncError> {
        self.state.lock().unwrap().options.remove(path);
        Ok(())
    }

    async fn set_if_absent(
        &self,
        path: &str,
        value: serde_json::Value,
    ) -> Result<bool, MerchsyncError> {
        let mut state = self.state.lock().unwrap();
        if state.options.contains_key(path) {
            Ok(false)
        } else {
            state.options.insert(path.to_string(), value);
            Ok(true)
        }
    }

    async fn get_cached(&self, key: &str) -> Result<Option<serde_json::Value>, MerchsyncError> {
        let now = self.now();
        let state = self.state.lock().unwrap();
        Ok(state
            .cache
            .get(key)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(value, _)| value.clone()))
    }

    async fn set_cached(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl_secs: u64,
    ) -> Result<(), MerchsyncError> {
        let expires_at = self.now() + ttl_secs;
        self.state
            .lock()
            .unwrap()
            .cache
            .insert(key.to_string(), (value, expires_at));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn options_round_trip() {
        let store = MemoryStore::new();
        store
            .set("validation.api.ping", serde_json::json!(true))
            .await
            .unwrap();
        assert_eq!(
            store.get("validation.api.ping").await.unwrap(),
            Some(serde_json::json!(true))
        );

        store.delete("validation.api.ping").await.unwrap();
        assert!(store.get("validation.api.ping").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_if_absent_claims_once() {
        let store = MemoryStore::new();
        assert!(
            store
                .set_if_absent("sync.started_at", serde_json::json!(1))
                .await
                .unwrap()
        );
        assert!(
            !store
                .set_if_absent("sync.started_at", serde_json::json!(2))
                .await
                .unwrap()
        );
        assert_eq!(store.peek("sync.started_at"), Some(serde_json::json!(1)));
    }

    #[tokio::test]
    async fn cache_expires_with_the_mock_clock() {
        let store = MemoryStore::new();
        store
            .set_cached("api-ping-check", serde_json::json!(true), 120)
            .await
            .unwrap();

        store.advance(119);
        assert!(store.get_cached("api-ping-check").await.unwrap().is_some());

        store.advance(1);
        assert!(store.get_cached("api-ping-check").await.unwrap().is_none());
    }
}
