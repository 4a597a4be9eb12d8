// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The `cache` gateway: the request-cache engine of spec.md §4.4, plus the
//! plugin glue that wires it into the loopback dispatcher.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod conditional;
pub mod directive;
pub mod entry;
pub mod error;
pub mod freshness;
pub mod gateway;
pub mod parser;
pub mod plugin;
pub mod range;

pub use directive::CacheControl;
pub use error::CacheError;
pub use gateway::{CacheGateway, PutOutcome, CACHE_STATUS_HEADER, SITES_BYPASS_PREFIX};
pub use plugin::CachePlugin;
