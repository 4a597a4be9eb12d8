// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Binding kinds injected into a worker (spec.md §3 "JSON/text/data/wasm
//! bindings, service bindings... Durable-Object class declarations, and
//! queue producer/consumer declarations").

use serde::{Deserialize, Serialize};

/// Where a `Service` binding's `fetch()` calls actually go.
///
/// Adjacently tagged rather than internally tagged: several variants wrap a
/// bare `String`/`PathBuf`, and serde can't fold a non-map value into an
/// internally tagged enum's tag object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ServiceBindingTarget {
    /// Another worker declared in the same `workerOptions[]` array, by name.
    Worker(String),
    /// A host-defined callback, invoked via the loopback server's
    /// `MF-Custom-Service` header dispatch.
    HostCallback { binding_name: String },
    /// The built-in "network" service: `fetch()` goes out to the real
    /// internet from the host.
    Network,
    /// A named external HTTP(S) origin.
    External(String),
    /// The built-in "disk" service, serving files from a directory.
    Disk(std::path::PathBuf),
}

/// One binding injected into a worker's environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Binding {
    Json { name: String, value: serde_json::Value },
    Text { name: String, value: String },
    Data { name: String, value_base64: String },
    WasmModule { name: String, path: std::path::PathBuf },
    KvNamespace { name: String, namespace: String },
    R2Bucket { name: String, bucket: String },
    D1Database { name: String, database: String },
    Service { name: String, target: ServiceBindingTarget },
    DurableObjectNamespace { name: String, class_name: String },
    Queue { name: String, queue: String },
}

impl Binding {
    pub fn name(&self) -> &str {
        match self {
            Binding::Json { name, .. }
            | Binding::Text { name, .. }
            | Binding::Data { name, .. }
            | Binding::WasmModule { name, .. }
            | Binding::KvNamespace { name, .. }
            | Binding::R2Bucket { name, .. }
            | Binding::D1Database { name, .. }
            | Binding::Service { name, .. }
            | Binding::DurableObjectNamespace { name, .. }
            | Binding::Queue { name, .. } => name,
        }
    }
}
