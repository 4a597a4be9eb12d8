// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The `d1` gateway: SQL execution against per-namespace SQLite databases
//! (spec.md §4.5 "D1"), plus the plugin glue that wires it into the
//! loopback dispatcher.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod entry;
pub mod error;
pub mod factory;
pub mod gateway;
pub mod plugin;

pub use entry::{D1Response, Statement};
pub use error::D1Error;
pub use gateway::D1Gateway;
pub use plugin::D1Plugin;
