// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Thin entry point: wires concrete plugins into the loopback server,
//! spawns the supervisor, and runs until a shutdown signal arrives.
//!
//! Configuration-surface options beyond this are deliberately out of
//! scope; everything here is environment-driven (see [`env`]).

mod env;

use anyhow::{Context, Result};
use mf_adapters::RoutedHandle;
use mf_cache::CachePlugin;
use mf_config::{SharedOptions, WorkerOptionsSet};
use mf_core::SystemClock;
use mf_d1::D1Plugin;
use mf_kv::KvPlugin;
use mf_loopback::{LoopbackServer, LoopbackState};
use mf_r2::R2Plugin;
use mf_supervisor::{ProcessApplier, ProcessApplierConfig, Supervisor};
use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

/// The JSON document pointed to by `MF_CONFIG`: a configuration generation
/// ready to hand to [`Supervisor::new`] verbatim.
#[derive(Debug, Deserialize)]
struct CliConfig {
    #[serde(default)]
    shared: SharedOptions,
    #[serde(default)]
    workers: Vec<WorkerOptionsSet>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn load_config() -> Result<CliConfig> {
    let path = env::config_path().context("MF_CONFIG must name a configuration file")?;
    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("parsing {} as a configuration document", path.display()))
}

fn parse_config(raw: &str) -> serde_json::Result<CliConfig> {
    serde_json::from_str(raw)
}

fn build_loopback_state(shared: &SharedOptions, reload_subscribe: mf_loopback::ReloadSubscribe) -> LoopbackState {
    let state_dir = env::state_dir();
    let clock = SystemClock;

    let cache = CachePlugin::new(state_dir.join("cache"), clock.clone(), shared.persist_option("cache").map(str::to_string));
    let kv = KvPlugin::new(state_dir.join("kv"), clock.clone(), shared.persist_option("kv").map(str::to_string));
    let r2 = R2Plugin::new(state_dir.join("r2"), clock, shared.persist_option("r2").map(str::to_string));
    let d1 = D1Plugin::new(state_dir.join("d1"), shared.persist_option("d1").map(str::to_string));

    let mut state = LoopbackState::new(reload_subscribe);
    state.register_plugin(Arc::new(cache));
    state.register_plugin(Arc::new(RoutedHandle::new(Arc::new(kv))));
    state.register_plugin(Arc::new(RoutedHandle::new(Arc::new(r2))));
    state.register_plugin(Arc::new(RoutedHandle::new(Arc::new(d1))));
    state
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = load_config()?;

    // `LoopbackState` needs a way to reach the supervisor's reload
    // broadcaster, but the supervisor needs the loopback server's bound
    // URL before it can be constructed. Bridge the cycle with a cell the
    // closure reads lazily and the supervisor fills in once it exists.
    let supervisor_cell: Arc<OnceLock<Supervisor>> = Arc::new(OnceLock::new());
    let reload_cell = Arc::clone(&supervisor_cell);
    let reload_subscribe: mf_loopback::ReloadSubscribe = Arc::new(move || match reload_cell.get() {
        Some(supervisor) => supervisor.subscribe_reload(),
        None => broadcast::channel(1).1,
    });

    let state = build_loopback_state(&config.shared, reload_subscribe);
    let host = env::host();
    let server = LoopbackServer::bind(&host, Arc::new(state)).await.context("binding loopback server")?;
    tracing::info!(url = %server.url(), "loopback server listening");

    let applier = Arc::new(ProcessApplier::new(ProcessApplierConfig {
        program: env::runtime_program().context("MF_RUNTIME_PROGRAM must name the worker-runtime binary")?,
        args: Vec::new(),
        env: std::collections::HashMap::new(),
        working_dir: None,
        host: host.clone(),
        entry_port: env::entry_port(),
        loopback_url: Some(server.url()),
        grace_period: std::time::Duration::from_secs(5),
        readiness_schedule: mf_process::ReadinessSchedule::default(),
    }));

    let supervisor = Supervisor::new(config.shared, config.workers, applier);
    let entry_url = supervisor.ready().await.context("worker runtime failed to become ready")?;
    tracing::info!(%entry_url, "worker runtime ready");
    // Safe to overwrite: nothing else observes `supervisor_cell` until the
    // reload closure is invoked by an incoming `/cdn-cgi/mf/reload` socket,
    // which only happens after this point.
    let _ = supervisor_cell.set(supervisor);

    tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;
    tracing::info!("shutting down");

    if let Some(supervisor) = supervisor_cell.get() {
        supervisor.dispose().await.context("disposing supervisor")?;
    }
    server.abort();
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
