// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The piece of the supervisor that actually owns a worker-runtime child:
//! spawning it, pushing a configuration generation down the control
//! socket, and driving the readiness probe. Pulled out behind a trait so
//! the reconfiguration mutex logic in [`crate::supervisor`] can be unit
//! tested against a fake instead of a real worker-runtime binary.

use crate::error::SupervisorError;
use async_trait::async_trait;
use mf_config::ServiceGraph;
use mf_core::OptionsVersion;
use mf_process::{spawn_worker, wait_for_ready, ProcessError, ReadinessSchedule, WorkerChild, WorkerSpawnSpec};
use mf_wire::{read_message, write_message, ControlRequest, ControlResponse};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Env vars the spawned worker-runtime binary reads to learn where to
/// listen and where to dial back (spec.md §6 "worker-runtime transport").
pub const CONTROL_PORT_ENV: &str = "MF_CONTROL_PORT";
pub const ENTRY_HOST_ENV: &str = "MF_ENTRY_HOST";
pub const ENTRY_PORT_ENV: &str = "MF_ENTRY_PORT";
pub const LOOPBACK_URL_ENV: &str = "MF_LOOPBACK_URL";

/// How long to wait for the freshly spawned child to connect to the
/// control socket before giving up on it.
const CONTROL_ACCEPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Applies one configuration generation to a worker runtime and reports
/// the entry URL once it is ready to serve traffic.
///
/// `abort` fires when the owning supervisor is disposed; implementations
/// must stop waiting (and return [`SupervisorError::Disposed`]) promptly
/// once it does.
#[async_trait]
pub trait ConfigurationApplier: Send + Sync + 'static {
    async fn apply(
        &self,
        version: OptionsVersion,
        graph: &ServiceGraph,
        abort: watch::Receiver<bool>,
    ) -> Result<String, SupervisorError>;

    async fn dispose(&self) -> Result<(), SupervisorError>;
}

/// Static parts of the spawn command that don't change across
/// reconfigurations.
pub struct ProcessApplierConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub host: String,
    /// Explicit entry port, or `None` to auto-discover one starting from
    /// an ephemeral OS-assigned port the first time a worker is spawned
    /// (spec.md §4.1 step 3).
    pub entry_port: Option<u16>,
    pub loopback_url: Option<String>,
    pub grace_period: Duration,
    pub readiness_schedule: ReadinessSchedule,
}

struct RunningWorker {
    child: WorkerChild,
    control: TcpStream,
}

/// Polls `child` until it exits and flips `exited_tx`. Raced against the
/// readiness probe via `tokio::select!` so both share the same `&mut
/// WorkerChild` without needing an `Arc<Mutex<_>>` the probe would have to
/// contend with a later `kill()` for.
async fn poll_until_exit(child: &mut WorkerChild, exited_tx: &watch::Sender<bool>) {
    loop {
        match child.try_wait() {
            Ok(Some(_status)) => {
                let _ = exited_tx.send(true);
                return;
            }
            Ok(None) => {}
            Err(_) => {
                let _ = exited_tx.send(true);
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

/// Real [`ConfigurationApplier`]: per spec.md §5 "exactly one live
/// instance", every accepted reconfiguration kills the prior child (if
/// any) and waits for its exit before spawning the next one.
pub struct ProcessApplier {
    config: ProcessApplierConfig,
    entry_port: Mutex<Option<u16>>,
    running: Mutex<Option<RunningWorker>>,
}

impl ProcessApplier {
    pub fn new(config: ProcessApplierConfig) -> Self {
        Self { config, entry_port: Mutex::new(None), running: Mutex::new(None) }
    }

    async fn resolve_entry_port(&self) -> Result<u16, SupervisorError> {
        let mut slot = self.entry_port.lock().await;
        if let Some(port) = *slot {
            return Ok(port);
        }
        let port = match self.config.entry_port {
            Some(port) => port,
            None => {
                let listener = TcpListener::bind((self.config.host.as_str(), 0)).await?;
                listener.local_addr()?.port()
            }
        };
        *slot = Some(port);
        Ok(port)
    }

    async fn kill_running(&self, running: &mut Option<RunningWorker>) -> Result<(), SupervisorError> {
        if let Some(mut worker) = running.take() {
            let _ = write_message(&mut worker.control, &ControlRequest::Shutdown { grace_period_ms: self.config.grace_period.as_millis() as u64 }).await;
            worker.child.kill(self.config.grace_period).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigurationApplier for ProcessApplier {
    async fn apply(
        &self,
        version: OptionsVersion,
        graph: &ServiceGraph,
        mut abort: watch::Receiver<bool>,
    ) -> Result<String, SupervisorError> {
        let entry_port = self.resolve_entry_port().await?;
        let entry_url = format!("http://{}:{}/", self.config.host, entry_port);

        let mut running = self.running.lock().await;
        self.kill_running(&mut *running).await?;

        let control_listener = TcpListener::bind((self.config.host.as_str(), 0)).await?;
        let control_port = control_listener.local_addr()?.port();

        let mut env = self.config.env.clone();
        env.insert(CONTROL_PORT_ENV.to_string(), control_port.to_string());
        env.insert(ENTRY_HOST_ENV.to_string(), self.config.host.clone());
        env.insert(ENTRY_PORT_ENV.to_string(), entry_port.to_string());
        if let Some(loopback_url) = &self.config.loopback_url {
            env.insert(LOOPBACK_URL_ENV.to_string(), loopback_url.clone());
        }

        let mut child = spawn_worker(WorkerSpawnSpec {
            program: self.config.program.clone(),
            args: self.config.args.clone(),
            env,
            working_dir: self.config.working_dir.clone(),
        })?;

        let (mut control, _) = tokio::select! {
            accepted = tokio::time::timeout(CONTROL_ACCEPT_TIMEOUT, control_listener.accept()) => {
                match accepted {
                    Ok(Ok(pair)) => pair,
                    Ok(Err(e)) => return Err(e.into()),
                    Err(_) => return Err(SupervisorError::RuntimeFailure("worker never connected to the control socket".to_string())),
                }
            }
            _ = abort.changed() => return Err(SupervisorError::Disposed),
        };

        let config_json = serde_json::to_value(graph).map_err(|e| SupervisorError::RuntimeFailure(e.to_string()))?;
        write_message(&mut control, &ControlRequest::SetOptions { version, config_json }).await?;
        match read_message::<_, ControlResponse>(&mut control).await? {
            ControlResponse::OptionsApplied { version: applied } if applied == version => {}
            ControlResponse::OptionsApplied { version: applied } => {
                return Err(SupervisorError::Rejected(format!(
                    "worker applied generation {applied} but {version} was requested"
                )));
            }
            ControlResponse::OptionsRejected { reason, .. } => return Err(SupervisorError::Rejected(reason)),
            other => return Err(SupervisorError::Rejected(format!("unexpected control response: {other:?}"))),
        }

        let pid = child.id();
        let (exited_tx, exited_rx) = watch::channel(false);
        let ready_probe = wait_for_ready(&entry_url, version, &self.config.readiness_schedule, exited_rx.clone(), abort.clone());
        tokio::pin!(ready_probe);
        let ready = tokio::select! {
            result = &mut ready_probe => result?,
            _ = poll_until_exit(&mut child, &exited_tx) => false,
        };
        if !ready {
            if *exited_rx.borrow() {
                let code = child.try_wait().ok().flatten().and_then(|s| s.code());
                return Err(SupervisorError::Process(ProcessError::ExitedBeforeReady(code)));
            }
            return Err(SupervisorError::Disposed);
        }

        info!(pid, version = %version, "worker runtime accepted configuration");
        *running = Some(RunningWorker { child, control });
        Ok(entry_url)
    }

    async fn dispose(&self) -> Result<(), SupervisorError> {
        let mut running = self.running.lock().await;
        self.kill_running(&mut *running).await
    }
}

impl Drop for ProcessApplier {
    fn drop(&mut self) {
        if self.running.try_lock().map(|g| g.is_some()).unwrap_or(false) {
            warn!("process applier dropped with a worker still running");
        }
    }
}

#[cfg(test)]
mod fake;
#[cfg(test)]
pub use fake::{ApplyCall, FakeApplier};

#[cfg(test)]
#[path = "applier_tests.rs"]
mod tests;
