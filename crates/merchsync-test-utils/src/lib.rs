// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock adapters and fixtures shared by merchsync tests.

pub mod memory_store;
pub mod mock_api;
pub mod mock_queue;

pub use memory_store::MemoryStore;
pub use mock_api::{ApiCallCounts, MockCommerceApi, MockConnector};
pub use mock_queue::RecordingQueue;
