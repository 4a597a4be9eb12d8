// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! mf-core: shared identifiers, clocks, and error primitives for the
//! miniflare-style local development harness.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod ids;
pub mod persistence;
pub mod sanitize;

pub use clock::{Clock, FakeClock, SystemClock};
pub use ids::{NamespaceName, OptionsVersion, PluginName, WorkerIndex};
pub use persistence::PersistenceDescriptor;
