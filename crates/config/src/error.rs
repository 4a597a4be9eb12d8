// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Configuration-kind errors (spec.md §7): surfaced synchronously from the
//! failing `setOptions`/`new` call, never as an HTTP response.

use mf_core::persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no workers defined")]
    NoWorkers,

    #[error("duplicate worker name {0:?}")]
    DuplicateWorkerName(String),

    #[error("worker {worker:?} has compatibility date {date} which is in the future")]
    CompatibilityDateInFuture { worker: String, date: chrono::NaiveDate },

    #[error("unsupported persistence scheme for namespace {namespace:?}: {source}")]
    UnsupportedPersistence { namespace: String, #[source] source: PersistenceError },

    #[error(
        "durable object class {class_name:?} on worker {worker:?} requires memory persistence \
         for the durable_objects namespace; persistence is not yet supported"
    )]
    DurableObjectPersistenceUnsupported { worker: String, class_name: String },

    #[error("service graph assembly failed: {0}")]
    ServiceGraph(#[from] mf_wire::ServiceGraphError),
}
