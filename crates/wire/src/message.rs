// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Control-channel messages exchanged between the supervisor and the
//! worker-runtime child process it owns.
//!
//! Tagged by `type` so new variants can be added without breaking older
//! peers that only match on the variants they know about.

use mf_core::OptionsVersion;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlRequest {
    /// Push a new, already-validated configuration generation down to the
    /// child. The child applies it and reports back with a matching
    /// `ControlResponse::OptionsApplied` once its internal state reflects it.
    SetOptions {
        version: OptionsVersion,
        config_json: serde_json::Value,
    },
    /// Ask the child to shut down gracefully within the given grace period.
    Shutdown { grace_period_ms: u64 },
    /// Liveness check over the control channel, independent of the HTTP
    /// readiness probe against the entry socket.
    Ping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlResponse {
    OptionsApplied { version: OptionsVersion },
    OptionsRejected { version: OptionsVersion, reason: String },
    ShuttingDown,
    Pong,
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
