// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Options shared across every worker in a configuration generation
//! (spec.md §3 "Shared options").

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Verbosity level for host-side logging, layered on top of `RUST_LOG`/
/// `tracing-subscriber`'s env-filter: this knob raises the floor, it never
/// lowers below what the env filter already permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    #[default]
    Quiet,
    Info,
    Debug,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub inspector_port: Option<u16>,
    #[serde(default)]
    pub verbosity: Verbosity,
    /// Raw `persist` option per plugin namespace (`cache`, `kv`, `r2`, `d1`,
    /// `durable_objects`), parsed lazily by each gateway factory via
    /// `mf_core::PersistenceDescriptor::parse`.
    #[serde(default)]
    pub persistence: IndexMap<String, Option<String>>,
    #[serde(default)]
    pub live_reload: bool,
    /// Default `cf` request-metadata envelope, merged under any per-request
    /// override supplied via the `MF-Cf-Blob` loopback header.
    #[serde(default = "default_cf")]
    pub cf: serde_json::Value,
}

fn default_cf() -> serde_json::Value {
    serde_json::json!({})
}

impl Default for SharedOptions {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            inspector_port: None,
            verbosity: Verbosity::default(),
            persistence: IndexMap::new(),
            live_reload: false,
            cf: default_cf(),
        }
    }
}

impl SharedOptions {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";

    pub fn resolved_host(&self) -> &str {
        self.host.as_deref().unwrap_or(Self::DEFAULT_HOST)
    }

    pub fn persist_option(&self, plugin: &str) -> Option<&str> {
        self.persistence.get(plugin).and_then(|v| v.as_deref())
    }
}
