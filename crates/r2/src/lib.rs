// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The `r2` gateway: a namespaced blob store with conditional reads/writes
//! and prefix/delimiter listing (spec.md §4.5 "R2"), plus the plugin glue
//! that wires it into the loopback dispatcher.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod entry;
pub mod error;
pub mod gateway;
pub mod limits;
pub mod plugin;

pub use error::R2Error;
pub use gateway::R2Gateway;
pub use plugin::R2Plugin;
