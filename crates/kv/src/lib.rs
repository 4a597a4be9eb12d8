// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The `kv` gateway: a namespaced key/value store with per-key TTL
//! (spec.md §4.5 "KV"), plus the plugin glue that wires it into the
//! loopback dispatcher.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod entry;
pub mod error;
pub mod gateway;
pub mod limits;
pub mod plugin;

pub use error::KvError;
pub use gateway::KvGateway;
pub use plugin::KvPlugin;
