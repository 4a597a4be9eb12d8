// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use mf_config::ConfigError;
use mf_process::ProcessError;
use mf_wire::WireError;
use thiserror::Error;

/// Host-side failures never surface as HTTP responses (spec.md §7); they
/// propagate straight to the `Supervisor` API caller instead.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("worker process error: {0}")]
    Process(#[from] ProcessError),
    #[error("control channel error: {0}")]
    Wire(#[from] WireError),
    #[error("control channel io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("worker rejected configuration: {0}")]
    Rejected(String),
    #[error("dispatch to entry socket failed: {0}")]
    Dispatch(#[from] reqwest::Error),
    #[error("supervisor has been disposed")]
    Disposed,
    #[error("runtime failure: {0}")]
    RuntimeFailure(String),
}

impl SupervisorError {
    /// Failures that leave the child process in an unknown state and make
    /// the supervisor unusable for further reconfiguration (spec.md §7
    /// "runtime supervision" errors), as opposed to a configuration error
    /// which leaves any already-running child untouched.
    pub fn is_runtime_failure(&self) -> bool {
        matches!(
            self,
            SupervisorError::Process(_) | SupervisorError::Wire(_) | SupervisorError::Io(_) | SupervisorError::Rejected(_)
        )
    }
}
