// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations over the storage schema.

pub mod cache;
pub mod options;
pub mod queue;
