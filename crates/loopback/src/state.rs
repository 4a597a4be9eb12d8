// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Shared context handed to every loopback route handler (spec.md §4.2):
//! one `Arc<LoopbackState>` threaded through all connection handling.

use crate::custom_service::CustomServiceRegistry;
use crate::error_page::{NoopSourceMapResolver, SourceMapResolver};
use indexmap::IndexMap;
use mf_adapters::LoopbackDispatch;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Produces a fresh live-reload subscription. Owned by whatever starts the
/// supervisor (the CLI entry point), since the reload fan-out itself lives
/// on the supervisor's side of the mutex (spec.md §4.1, §5).
pub type ReloadSubscribe = Arc<dyn Fn() -> broadcast::Receiver<()> + Send + Sync>;

pub struct LoopbackState {
    plugins: IndexMap<&'static str, Arc<dyn LoopbackDispatch>>,
    pub(crate) custom_services: CustomServiceRegistry,
    pub(crate) reload_subscribe: ReloadSubscribe,
    pub(crate) source_map: Arc<dyn SourceMapResolver>,
}

impl LoopbackState {
    pub fn new(reload_subscribe: ReloadSubscribe) -> Self {
        Self {
            plugins: IndexMap::new(),
            custom_services: CustomServiceRegistry::new(),
            reload_subscribe,
            source_map: Arc::new(NoopSourceMapResolver),
        }
    }

    pub fn with_source_map(mut self, resolver: Arc<dyn SourceMapResolver>) -> Self {
        self.source_map = resolver;
        self
    }

    /// Register a plugin under its `plugin_name()` as the loopback path
    /// prefix (spec.md §4.2 `/<pluginName>/<...>`).
    pub fn register_plugin(&mut self, plugin: Arc<dyn LoopbackDispatch>) {
        self.plugins.insert(plugin.plugin_name(), plugin);
    }

    pub fn custom_services(&self) -> &CustomServiceRegistry {
        &self.custom_services
    }

    pub(crate) fn plugin(&self, name: &str) -> Option<&Arc<dyn LoopbackDispatch>> {
        self.plugins.get(name)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
