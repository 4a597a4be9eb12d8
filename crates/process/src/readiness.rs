// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Readiness probe: polls the entry socket until the worker reports it has
//! applied a given configuration generation, or gives up.
//!
//! A dedicated client with keep-alive disabled avoids the probe reusing a
//! connection across a worker restart, which would otherwise read from a
//! half-torn-down socket and misreport readiness.

use mf_core::OptionsVersion;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// The back-off schedule from spec.md §4.1 step 6: 10ms x10, 50ms x10,
/// 100ms x10, then 1s forever until the caller's signal aborts.
#[derive(Debug, Clone)]
pub struct ReadinessSchedule {
    steps: Vec<(Duration, u32)>,
    tail: Duration,
}

impl Default for ReadinessSchedule {
    fn default() -> Self {
        Self {
            steps: vec![
                (Duration::from_millis(10), 10),
                (Duration::from_millis(50), 10),
                (Duration::from_millis(100), 10),
            ],
            tail: Duration::from_secs(1),
        }
    }
}

impl ReadinessSchedule {
    /// Iterator of delays, the final one repeating indefinitely.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        self.steps
            .iter()
            .flat_map(|(delay, count)| std::iter::repeat(*delay).take(*count as usize))
            .chain(std::iter::repeat(self.tail))
    }
}

/// The header carrying the generation the probe expects the entry worker to
/// have applied already.
pub const PROBE_HEADER: &str = "MF-Loopback-Options-Version";

fn is_transient(err: &reqwest::Error) -> bool {
    // Connection refused/reset, DNS failure, and timeouts are all expected
    // while a freshly spawned worker is still coming up; anything else
    // (TLS failure, malformed URL) is a real misconfiguration.
    err.is_connect() || err.is_timeout() || err.is_request()
}

/// Poll `entry_url` with the probe header set to `version` until the worker
/// answers with a successful status, the child exits (signalled on
/// `exited`), or `abort` fires.
///
/// Returns `Ok(true)` on success, `Ok(false)` if aborted or the child
/// exited first.
pub async fn wait_for_ready(
    entry_url: &str,
    version: OptionsVersion,
    schedule: &ReadinessSchedule,
    mut exited: watch::Receiver<bool>,
    mut abort: watch::Receiver<bool>,
) -> Result<bool, crate::error::ProcessError> {
    let client = Client::builder()
        .pool_max_idle_per_host(0)
        .connection_verbose(false)
        .build()
        .map_err(|e| crate::error::ProcessError::Spawn(std::io::Error::other(e.to_string())))?;

    for delay in schedule.delays() {
        if *exited.borrow() || *abort.borrow() {
            return Ok(false);
        }

        let attempt = client
            .get(entry_url)
            .header(PROBE_HEADER, version.to_string())
            .header(reqwest::header::CONNECTION, "close")
            .send()
            .await;

        match attempt {
            Ok(resp) if resp.status().is_success() => return Ok(true),
            Ok(resp) => {
                debug!(status = %resp.status(), "readiness probe: not ready yet");
            }
            Err(e) if is_transient(&e) => {
                debug!(error = %e, "readiness probe: transient error");
            }
            Err(e) => return Err(crate::error::ProcessError::Spawn(std::io::Error::other(e.to_string()))),
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = exited.changed() => { if *exited.borrow() { return Ok(false); } }
            _ = abort.changed() => { if *abort.borrow() { return Ok(false); } }
        }
    }

    Ok(false)
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
