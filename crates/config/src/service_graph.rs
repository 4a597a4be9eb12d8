// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Assembly of the service graph sent to the worker runtime (spec.md §3
//! "Service graph", §9 design note on dead-letter-queue cycles).

use crate::binding::ServiceBindingTarget;
use crate::error::ConfigError;
use crate::shared::SharedOptions;
use crate::worker::WorkerOptionsSet;
use mf_core::{OptionsVersion, WorkerIndex};
use mf_wire::service_graph::{ServiceDecl, WireServiceGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Non-worker service bodies a `Service` can resolve to (spec.md §3).
///
/// Adjacently tagged: `Worker`/`External`/`Disk` wrap a bare
/// `WorkerIndex`/`String`/`PathBuf`, which an internally tagged enum can't
/// fold into its tag object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ServiceRef {
    Worker(WorkerIndex),
    Network,
    External(String),
    Disk(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub body: ServiceRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socket {
    pub name: String,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceGraph {
    pub version: OptionsVersion,
    pub services: Vec<Service>,
    pub sockets: Vec<Socket>,
    /// Wire-safe encoding of the dead-letter-queue reference chain, immune
    /// to cycles since it indexes into a flat table rather than embedding
    /// targets inline.
    pub queue_dead_letters: WireServiceGraph,
}

/// Validate and assemble the service graph for one configuration
/// generation.
///
/// Validation order matches spec.md §7's synchronous configuration-error
/// list: no-workers, duplicate names, future compatibility dates, durable
/// object persistence, then graph assembly.
pub fn build_service_graph(
    version: OptionsVersion,
    shared: &SharedOptions,
    workers: &[WorkerOptionsSet],
) -> Result<ServiceGraph, ConfigError> {
    if workers.is_empty() {
        return Err(ConfigError::NoWorkers);
    }

    let today = chrono::Utc::now().date_naive();
    let mut seen_names = HashSet::new();
    let mut worker_names = Vec::with_capacity(workers.len());

    for (i, worker) in workers.iter().enumerate() {
        let name = worker.display_name(i);
        if !seen_names.insert(name.clone()) {
            return Err(ConfigError::DuplicateWorkerName(name));
        }
        if worker.compatibility_date > today {
            return Err(ConfigError::CompatibilityDateInFuture {
                worker: name.clone(),
                date: worker.compatibility_date,
            });
        }
        worker_names.push(name);
    }

    let do_persist = shared.persist_option("durable_objects");
    if do_persist.is_some() && do_persist != Some("false") {
        for (i, worker) in workers.iter().enumerate() {
            if let Some(class) = worker.durable_objects.first() {
                return Err(ConfigError::DurableObjectPersistenceUnsupported {
                    worker: worker_names[i].clone(),
                    class_name: class.class_name.clone(),
                });
            }
        }
    }

    let mut services = Vec::new();
    let mut seen_service_names = HashSet::new();
    let mut sockets = Vec::new();

    for (i, (name, worker)) in worker_names.iter().zip(workers.iter()).enumerate() {
        if seen_service_names.insert(name.clone()) {
            services.push(Service { name: name.clone(), body: ServiceRef::Worker(WorkerIndex(i)) });
        }

        for binding in &worker.bindings {
            if let crate::binding::Binding::Service { target, .. } = binding {
                let (svc_name, svc_ref) = match target {
                    ServiceBindingTarget::Worker(w) => resolve_worker_service(w, &worker_names),
                    ServiceBindingTarget::Network => ("network".to_string(), ServiceRef::Network),
                    ServiceBindingTarget::External(origin) => {
                        (format!("external:{origin}"), ServiceRef::External(origin.clone()))
                    }
                    ServiceBindingTarget::Disk(path) => {
                        (format!("disk:{}", path.display()), ServiceRef::Disk(path.clone()))
                    }
                    ServiceBindingTarget::HostCallback { .. } => continue,
                };
                if seen_service_names.insert(svc_name.clone()) {
                    services.push(Service { name: svc_name, body: svc_ref });
                }
            }
        }
    }

    sockets.push(Socket { name: "entry".to_string(), service: worker_names[0].clone() });

    let mut decls = Vec::new();
    for worker in workers {
        for consumer in &worker.queue_consumers {
            decls.push(ServiceDecl {
                name: consumer.queue.clone(),
                dead_letter_queue: consumer.dead_letter_queue.clone(),
            });
        }
    }
    let queue_dead_letters = WireServiceGraph::build(decls)?;

    Ok(ServiceGraph { version, services, sockets, queue_dead_letters })
}

fn resolve_worker_service(name: &str, known: &[String]) -> (String, ServiceRef) {
    let idx = known.iter().position(|n| n == name);
    match idx {
        Some(i) => (name.to_string(), ServiceRef::Worker(WorkerIndex(i))),
        // Forward reference to a worker defined later, or a typo; the
        // worker runtime rejects unknown service names itself, the host
        // doesn't duplicate that validation.
        None => (name.to_string(), ServiceRef::Worker(WorkerIndex(known.len()))),
    }
}

#[cfg(test)]
#[path = "service_graph_tests.rs"]
mod tests;
