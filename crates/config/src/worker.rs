// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! One worker's configuration record (spec.md §3 "Worker options set").

use crate::binding::Binding;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    EsModule,
    CommonJs,
    Text,
    Data,
    CompiledWasm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    pub name: String,
    pub kind: ModuleKind,
    /// Present for text-like module kinds; absent for `CompiledWasm`, which
    /// is loaded from `path` instead.
    pub content: Option<String>,
    pub path: Option<PathBuf>,
}

/// How a worker's code was supplied.
///
/// Adjacently tagged: `Inline`/`Path` wrap a bare `String`/`PathBuf`, which
/// an internally tagged enum can't fold into its tag object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScriptSource {
    Inline(String),
    Path(PathBuf),
    Modules(Vec<ModuleDefinition>),
}

/// A Durable Object class a worker exposes. Its wire-level unique key is
/// `<workerName>-<className>`, per the newer-draft semantics spec.md §9
/// instructs re-implementations to follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurableObjectClass {
    pub class_name: String,
    /// The worker the class's instances actually run in, if different from
    /// the declaring worker (a worker can expose a class implemented by a
    /// sibling).
    pub script_name: Option<String>,
}

impl DurableObjectClass {
    /// The unique key used to address stored state for this class.
    pub fn unique_key(&self, worker_name: &str) -> String {
        format!("{worker_name}-{}", self.class_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueProducer {
    pub binding: String,
    pub queue: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConsumer {
    pub queue: String,
    /// Name of another queue to forward messages to after exhausting
    /// retries. May (transitively) point back at a consumer earlier in the
    /// chain; see `mf_wire::WireServiceGraph` for how that cycle is encoded.
    pub dead_letter_queue: Option<String>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerOptionsSet {
    pub name: Option<String>,
    pub script: ScriptSource,
    /// Glob-style rules restricting which paths resolve against which
    /// module, e.g. `*.wasm` -> `CompiledWasm`. Stored as raw strings; the
    /// worker runtime interprets them, not the host.
    pub module_rules: Vec<String>,
    pub compatibility_date: NaiveDate,
    pub compatibility_flags: Vec<String>,
    pub bindings: Vec<Binding>,
    pub durable_objects: Vec<DurableObjectClass>,
    pub queue_producers: Vec<QueueProducer>,
    pub queue_consumers: Vec<QueueConsumer>,
}

impl WorkerOptionsSet {
    pub fn display_name(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("worker-{index}"))
    }
}
