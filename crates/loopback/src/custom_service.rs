// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Host-defined service-callback dispatch (spec.md §4.2 "Any custom-service
//! dispatch is keyed by a request header whose value identifies
//! `<workerIndex>/<bindingName>`").

use mf_adapters::HttpError;
use mf_wire::UniversalRequest;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type CustomServiceFuture =
    Pin<Box<dyn Future<Output = Result<mf_wire::UniversalResponse, HttpError>> + Send>>;
pub type CustomServiceHandler = Arc<dyn Fn(UniversalRequest) -> CustomServiceFuture + Send + Sync>;

/// Registers host callbacks by the `<workerIndex>/<bindingName>` key the
/// loopback server reads off the `MF-Custom-Service` header.
#[derive(Default)]
pub struct CustomServiceRegistry {
    handlers: RwLock<HashMap<String, CustomServiceHandler>>,
}

impl CustomServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, worker_index: mf_core::WorkerIndex, binding_name: &str, handler: CustomServiceHandler) {
        self.handlers.write().insert(key(worker_index, binding_name), handler);
    }

    pub fn get(&self, selector: &str) -> Option<CustomServiceHandler> {
        self.handlers.read().get(selector).cloned()
    }
}

fn key(worker_index: mf_core::WorkerIndex, binding_name: &str) -> String {
    format!("{}/{binding_name}", worker_index.0)
}

#[cfg(test)]
#[path = "custom_service_tests.rs"]
mod tests;
