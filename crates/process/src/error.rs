// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn worker process: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("failed to wait on worker process: {0}")]
    Wait(#[source] std::io::Error),
    #[error("worker never became ready after exhausting the readiness schedule")]
    ReadinessTimeout,
    #[error("worker exited before becoming ready (code {0:?})")]
    ExitedBeforeReady(Option<i32>),
}
