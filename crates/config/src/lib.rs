// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Worker options, shared options, and service-graph assembly: the
//! configuration data model the supervisor validates and pushes down to the
//! worker runtime on every generation.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod binding;
pub mod error;
pub mod service_graph;
pub mod shared;
pub mod worker;

pub use binding::{Binding, ServiceBindingTarget};
pub use error::ConfigError;
pub use service_graph::{Service, ServiceGraph, ServiceRef, Socket};
pub use shared::SharedOptions;
pub use worker::{
    DurableObjectClass, ModuleDefinition, ModuleKind, QueueConsumer, QueueProducer, ScriptSource,
    WorkerOptionsSet,
};
