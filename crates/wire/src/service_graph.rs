// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Wire encoding of the service graph.
//!
//! Dead-letter-queue references can point at any other service, including
//! one that (transitively) points back at the service doing the pointing.
//! A naive recursive value encoder (each service embedding its DLQ target
//! inline) can't terminate on such a graph, so services are instead stored
//! in a flat table and cross-references are plain integer indices into it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceNodeId(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceNode {
    pub name: String,
    /// Index of the service this one's dead-letter queue forwards to, if any.
    pub dead_letter_queue: Option<ServiceNodeId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireServiceGraph {
    pub nodes: Vec<ServiceNode>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceGraphError {
    #[error("a dead letter queue references unknown service {0:?}")]
    UnknownReference(String),
}

/// One service's declaration prior to resolution: a name plus the name of
/// the service its dead-letter queue forwards to, if any.
pub struct ServiceDecl {
    pub name: String,
    pub dead_letter_queue: Option<String>,
}

impl WireServiceGraph {
    /// Build the flat wire representation from a list of declarations.
    ///
    /// Services are deduplicated by name, first occurrence wins — mirroring
    /// how the rest of the service-assembly pipeline resolves name clashes.
    pub fn build(decls: Vec<ServiceDecl>) -> Result<WireServiceGraph, ServiceGraphError> {
        let mut name_to_id: HashMap<String, ServiceNodeId> = HashMap::new();
        let mut order: Vec<&ServiceDecl> = Vec::new();
        for decl in &decls {
            if !name_to_id.contains_key(&decl.name) {
                name_to_id.insert(decl.name.clone(), ServiceNodeId(order.len() as u32));
                order.push(decl);
            }
        }

        let mut nodes = Vec::with_capacity(order.len());
        for decl in order {
            let dead_letter_queue = match &decl.dead_letter_queue {
                None => None,
                Some(target) => Some(
                    *name_to_id
                        .get(target)
                        .ok_or_else(|| ServiceGraphError::UnknownReference(target.clone()))?,
                ),
            };
            nodes.push(ServiceNode { name: decl.name.clone(), dead_letter_queue });
        }

        Ok(WireServiceGraph { nodes })
    }

    pub fn node(&self, id: ServiceNodeId) -> Option<&ServiceNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn find_by_name(&self, name: &str) -> Option<ServiceNodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| ServiceNodeId(i as u32))
    }
}

#[cfg(test)]
#[path = "service_graph_tests.rs"]
mod tests;
