// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The per-plugin contract (spec.md §4.3): bindings to inject into the
//! worker runtime, extra internal services for the service graph, and an
//! optional gateway + router for handling loopback requests.

use crate::router::Router;
use mf_config::{Binding, Service, WorkerOptionsSet};
use mf_core::WorkerIndex;

/// Shared context a plugin's `getServices` needs: the set of configured
/// workers and the shared options, handed down by the supervisor on every
/// reconfiguration.
pub struct PluginContext<'a> {
    pub workers: &'a [WorkerOptionsSet],
}

/// One pluggable capability (`cache`, `kv`, `r2`, `d1`, `durable_objects`).
///
/// A plugin that only contributes bindings (no loopback surface) simply
/// returns an empty router from whatever owns dispatch; this trait covers
/// the binding/service half of the contract shared by all plugins.
pub trait Plugin: Send + Sync {
    /// Stable identifier used as the loopback path prefix and in logs.
    fn name(&self) -> &'static str;

    /// Bindings to inject into the given worker (KV handle names, R2
    /// bucket references, service callbacks, text/data blobs).
    fn get_bindings(&self, options: &WorkerOptionsSet, worker_index: WorkerIndex) -> Vec<Binding>;

    /// Additional internal services to embed in the service graph (e.g. a
    /// cache loopback worker). Most plugins contribute none.
    fn get_services(&self, ctx: &PluginContext<'_>) -> Vec<Service> {
        let _ = ctx;
        Vec::new()
    }

    /// Drop all cached gateway state. Test-only: lets integration tests
    /// reuse one plugin instance across cases without leaking namespaces
    /// between them.
    #[cfg(test)]
    fn reset_for_tests(&self);
}

/// A plugin that also handles loopback HTTP requests under `/<name()>/...`.
pub trait RoutedPlugin<Ctx>: Plugin {
    fn router(&self) -> &Router<Ctx>;
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
