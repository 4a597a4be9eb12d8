// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Test double for [`crate::applier::ConfigurationApplier`]: records calls
//! and lets a test script failures and artificial delays without spawning
//! a real process.

use crate::applier::ConfigurationApplier;
use crate::error::SupervisorError;
use async_trait::async_trait;
use mf_config::ServiceGraph;
use mf_core::OptionsVersion;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct ApplyCall {
    pub version: OptionsVersion,
    pub worker_count: usize,
}

/// Records every `apply`/`dispose` call instead of touching a real
/// process; optionally delays (to simulate a slow readiness probe, for
/// exercising the supersede-suppression logic) or fails specific
/// generations.
pub struct FakeApplier {
    calls: Mutex<Vec<ApplyCall>>,
    disposed: Mutex<bool>,
    delay: Duration,
    fail_versions: Mutex<HashSet<u64>>,
}

impl FakeApplier {
    pub fn new() -> Self {
        Self { calls: Mutex::new(Vec::new()), disposed: Mutex::new(false), delay: Duration::ZERO, fail_versions: Mutex::new(HashSet::new()) }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay, ..Self::new() }
    }

    pub fn fail_on(&self, version: OptionsVersion) {
        self.fail_versions.lock().insert(version.0);
    }

    pub fn applied_versions(&self) -> Vec<OptionsVersion> {
        self.calls.lock().iter().map(|c| c.version).collect()
    }

    pub fn calls(&self) -> Vec<ApplyCall> {
        self.calls.lock().clone()
    }

    pub fn was_disposed(&self) -> bool {
        *self.disposed.lock()
    }
}

impl Default for FakeApplier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigurationApplier for FakeApplier {
    async fn apply(&self, version: OptionsVersion, graph: &ServiceGraph, mut abort: watch::Receiver<bool>) -> Result<String, SupervisorError> {
        self.calls.lock().push(ApplyCall { version, worker_count: graph.services.len() });

        if !self.delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(self.delay) => {}
                _ = abort.changed() => return Err(SupervisorError::Disposed),
            }
        }

        if self.fail_versions.lock().contains(&version.0) {
            return Err(SupervisorError::RuntimeFailure(format!("fake applier configured to fail generation {version}")));
        }

        Ok(format!("http://127.0.0.1:0/fake-entry/{}", version.0))
    }

    async fn dispose(&self) -> Result<(), SupervisorError> {
        *self.disposed.lock() = true;
        Ok(())
    }
}
