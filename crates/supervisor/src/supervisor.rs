// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The runtime mutex (spec.md §4.1, §5, §9): a single background task that
//! owns all reconfiguration, modeled as a message-passing loop over an
//! `mpsc` channel rather than a nested async lock, exactly as the design
//! note prescribes.

use crate::applier::ConfigurationApplier;
use crate::error::SupervisorError;
use crate::reload::LiveReloadHub;
use bytes::Bytes;
use mf_config::{build_service_graph, SharedOptions, WorkerOptionsSet};
use mf_core::OptionsVersion;
use mf_wire::{MultiHeaderMap, ResponseBody, UniversalRequest, UniversalResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::info;

#[derive(Debug, Clone)]
enum EntryState {
    Pending,
    Ready { entry_url: String },
    Failed { message: String },
}

enum Command {
    Reconfigure { shared: SharedOptions, workers: Vec<WorkerOptionsSet>, reply: oneshot::Sender<Result<(), SupervisorError>> },
    Dispose { reply: oneshot::Sender<Result<(), SupervisorError>> },
}

/// Owns the worker-runtime child-process lifecycle and every accepted
/// reconfiguration (spec.md §4.1 "Supervisor").
///
/// Public contract: `new`, `set_options`, `dispatch_fetch`, `dispose` —
/// unchanged from spec.md, backed here by an `mpsc`-driven background task
/// instead of a nested lock.
pub struct Supervisor {
    commands: mpsc::Sender<Command>,
    entry: watch::Receiver<EntryState>,
    abort: watch::Sender<bool>,
    reload: LiveReloadHub,
    disposed: Arc<AtomicBool>,
    http: reqwest::Client,
}

impl Supervisor {
    /// Begins initialization under the runtime mutex and returns
    /// immediately; call [`Supervisor::ready`] to await the entry URL.
    pub fn new(shared: SharedOptions, workers: Vec<WorkerOptionsSet>, applier: Arc<dyn ConfigurationApplier>) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(16);
        let (entry_tx, entry_rx) = watch::channel(EntryState::Pending);
        let (abort_tx, abort_rx) = watch::channel(false);
        let reload = LiveReloadHub::new();

        tokio::spawn(run(commands_rx, applier, entry_tx, abort_rx, reload.clone()));

        // `new` must return immediately (spec.md §4.1): enqueue the initial
        // generation without waiting for it to apply. The channel was just
        // created with spare capacity, so `try_send` cannot fail here.
        let (reply_tx, _reply_rx) = oneshot::channel();
        let _ = commands_tx.try_send(Command::Reconfigure { shared, workers, reply: reply_tx });

        Self {
            commands: commands_tx,
            entry: entry_rx,
            abort: abort_tx,
            reload,
            disposed: Arc::new(AtomicBool::new(false)),
            http: reqwest::Client::new(),
        }
    }

    /// Resolves to the current entry URL once initialization (or the most
    /// recently accepted reconfiguration) has completed.
    pub async fn ready(&self) -> Result<String, SupervisorError> {
        let mut rx = self.entry.clone();
        loop {
            let state = rx.borrow().clone();
            match state {
                EntryState::Ready { entry_url } => return Ok(entry_url),
                EntryState::Failed { message } => return Err(SupervisorError::RuntimeFailure(message)),
                EntryState::Pending => {
                    if rx.changed().await.is_err() {
                        return Err(SupervisorError::Disposed);
                    }
                }
            }
        }
    }

    /// Enqueues a reconfiguration behind any in-flight one; resolves once
    /// *this* reconfiguration has been applied (spec.md §4.1, FIFO order).
    pub async fn set_options(&self, shared: SharedOptions, workers: Vec<WorkerOptionsSet>) -> Result<(), SupervisorError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(SupervisorError::Disposed);
        }
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Reconfigure { shared, workers, reply: reply_tx })
            .await
            .map_err(|_| SupervisorError::Disposed)?;
        reply_rx.await.map_err(|_| SupervisorError::Disposed)?
    }

    /// Awaits readiness, rewrites the request's host onto the current
    /// entry URL, and forwards it (spec.md §4.1 `dispatchFetch`).
    pub async fn dispatch_fetch(&self, request: UniversalRequest) -> Result<UniversalResponse, SupervisorError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(SupervisorError::Disposed);
        }
        let entry_url = self.ready().await?;
        let target = rewrite_host(&request.url, &entry_url)?;

        let mut builder = self.http.request(request.method, target);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        let response = builder.body(request.body).send().await?;

        let status = response.status().as_u16();
        let mut headers = MultiHeaderMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str(), value);
            }
        }
        let body: Bytes = response.bytes().await?;
        Ok(UniversalResponse { status, headers, body: ResponseBody::Bytes(body) })
    }

    /// Aborts any in-flight readiness wait, tears down the child, and
    /// releases all handles. Idempotent.
    pub async fn dispose(&self) -> Result<(), SupervisorError> {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let _ = self.abort.send(true);
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.commands.send(Command::Dispose { reply: reply_tx }).await.is_err() {
            return Ok(());
        }
        reply_rx.await.unwrap_or(Ok(()))
    }

    /// Subscribe to live-reload fan-out (spec.md §4.2 "Live-reload"); the
    /// loopback server's reload-socket handler owns closing with code 1012
    /// on every notification this yields.
    pub fn subscribe_reload(&self) -> tokio::sync::broadcast::Receiver<()> {
        self.reload.subscribe()
    }
}

fn rewrite_host(request_url: &str, entry_url: &str) -> Result<String, SupervisorError> {
    let entry = url::Url::parse(entry_url).map_err(|e| SupervisorError::RuntimeFailure(e.to_string()))?;
    let mut target = url::Url::parse(request_url).or_else(|_| entry.join(request_url)).map_err(|e| SupervisorError::RuntimeFailure(e.to_string()))?;
    let _ = target.set_scheme(entry.scheme());
    target.set_host(entry.host_str()).map_err(|_| SupervisorError::RuntimeFailure("entry url carries no host to rewrite onto".to_string()))?;
    target.set_port(entry.port()).map_err(|_| SupervisorError::RuntimeFailure("entry url has no authority to rewrite onto".to_string()))?;
    Ok(target.to_string())
}

/// The background task owning the runtime mutex. A single FIFO loop over
/// `commands` replaces the nested-lock design spec.md describes; applying
/// each accepted generation in order gives the same ordering guarantee
/// while making "is a newer reconfiguration already queued" (`hasWaiting`)
/// a cheap, lock-free channel-length check.
async fn run(
    mut commands: mpsc::Receiver<Command>,
    applier: Arc<dyn ConfigurationApplier>,
    entry_tx: watch::Sender<EntryState>,
    abort_rx: watch::Receiver<bool>,
    reload: LiveReloadHub,
) {
    let mut version = OptionsVersion::INITIAL;
    let mut has_applied_once = false;
    let mut unusable: Option<String> = None;

    while let Some(command) = commands.recv().await {
        match command {
            Command::Reconfigure { shared, workers, reply } => {
                if let Some(message) = &unusable {
                    let _ = reply.send(Err(SupervisorError::RuntimeFailure(message.clone())));
                    continue;
                }

                version = version.next();
                let outcome = apply_generation(applier.as_ref(), version, &shared, &workers, abort_rx.clone()).await;

                match outcome {
                    Ok(entry_url) => {
                        let _ = entry_tx.send(EntryState::Ready { entry_url });
                        // hasWaiting: suppress the ready/updated log and
                        // reload fan-out if a newer reconfiguration is
                        // already queued behind this one (spec.md §5).
                        if commands.len() == 0 {
                            let event = if has_applied_once { "updated" } else { "ready" };
                            info!(event, version = version.0, "configuration applied");
                            reload.fire();
                        }
                        has_applied_once = true;
                        let _ = reply.send(Ok(()));
                    }
                    Err(err) => {
                        if err.is_runtime_failure() {
                            unusable = Some(err.to_string());
                        }
                        let _ = entry_tx.send(EntryState::Failed { message: err.to_string() });
                        let _ = reply.send(Err(err));
                    }
                }
            }
            Command::Dispose { reply } => {
                let result = applier.dispose().await;
                let _ = reply.send(result);
                break;
            }
        }
    }
}

/// Validates and assembles the service graph before ever touching the
/// child process, so a configuration error (spec.md §7) never kills an
/// already-running worker.
async fn apply_generation(
    applier: &dyn ConfigurationApplier,
    version: OptionsVersion,
    shared: &SharedOptions,
    workers: &[WorkerOptionsSet],
    abort: watch::Receiver<bool>,
) -> Result<String, SupervisorError> {
    let graph = build_service_graph(version, shared, workers)?;
    applier.apply(version, &graph, abort).await
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
