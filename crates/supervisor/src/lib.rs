// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Owns the worker-runtime child process: spawning it, pushing
//! configuration generations down a control socket, probing readiness,
//! and forwarding dispatched requests to the current entry socket.
//!
//! The reconfiguration mutex (spec.md §4.1, §5) lives in [`supervisor`];
//! the piece that actually talks to a child process lives behind the
//! [`applier::ConfigurationApplier`] trait so the mutex logic can be
//! tested against [`applier::FakeApplier`] instead of a real binary.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod applier;
pub mod error;
pub mod reload;
pub mod supervisor;

pub use applier::{ConfigurationApplier, ProcessApplier, ProcessApplierConfig};
pub use error::SupervisorError;
pub use reload::LiveReloadHub;
pub use supervisor::Supervisor;

#[cfg(test)]
pub use applier::{ApplyCall, FakeApplier};
