// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use crate::error::ProcessError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{info, warn};

/// Everything needed to spawn one worker-runtime child process.
pub struct WorkerSpawnSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub working_dir: Option<PathBuf>,
}

/// A running worker-runtime child, with its stdio being drained into
/// tracing events in the background.
pub struct WorkerChild {
    child: Child,
}

impl WorkerChild {
    /// Attempt a graceful exit by waiting up to `grace_period`, then fall
    /// back to a hard kill.
    ///
    /// The control channel (see `mf-wire::ControlRequest::Shutdown`) is the
    /// preferred way to ask a worker to exit cleanly; this is the backstop
    /// for a worker that doesn't respond to it.
    pub async fn kill(&mut self, grace_period: Duration) -> Result<(), ProcessError> {
        match tokio::time::timeout(grace_period, self.child.wait()).await {
            Ok(Ok(status)) => {
                info!(code = status.code(), "worker exited during grace period");
                Ok(())
            }
            Ok(Err(e)) => Err(ProcessError::Wait(e)),
            Err(_) => {
                warn!("worker did not exit within grace period, killing");
                self.child.kill().await.map_err(ProcessError::Wait)?;
                Ok(())
            }
        }
    }

    pub async fn wait(&mut self) -> Result<std::process::ExitStatus, ProcessError> {
        self.child.wait().await.map_err(ProcessError::Wait)
    }

    pub fn try_wait(&mut self) -> Result<Option<std::process::ExitStatus>, ProcessError> {
        self.child.try_wait().map_err(ProcessError::Wait)
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

/// Spawn a worker-runtime child with piped stdio, and start background
/// tasks that drain stdout/stderr into tracing events line by line.
pub fn spawn_worker(spec: WorkerSpawnSpec) -> Result<WorkerChild, ProcessError> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .envs(&spec.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.working_dir {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(ProcessError::Spawn)?;
    let pid = child.id();

    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(drain_lines(stdout, pid, false));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(drain_lines(stderr, pid, true));
    }

    Ok(WorkerChild { child })
}

async fn drain_lines<R>(reader: R, pid: Option<u32>, is_stderr: bool)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if is_stderr {
                    warn!(pid, worker_stderr = %line);
                } else {
                    info!(pid, worker_stdout = %line);
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(pid, error = %e, "error reading worker stdio");
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
