// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Per-(plugin, namespace) gateway construction and caching (spec.md §4.3
//! "Persistence handle construction", §3 "Storage handle" invariants).
//!
//! A map from identity to a built value, rebuilt only when the thing that
//! determines its shape changes.

use mf_core::sanitize::sanitize_namespace;
use mf_core::{NamespaceName, PersistenceDescriptor};
use mf_storage::{FileBackend, MemoryBackend, SqliteBackend, StorageBackend, StorageError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("persistence configuration error: {0}")]
    Persistence(#[from] mf_core::persistence::PersistenceError),
    #[error("storage backend error: {0}")]
    Storage(#[from] StorageError),
}

struct CachedEntry<G> {
    descriptor: PersistenceDescriptor,
    gateway: Arc<G>,
}

/// Builds and caches gateway instances of type `G`, one per namespace,
/// rebuilding only when the namespace's persistence descriptor changes.
///
/// In-process memory backends are kept in a separate, never-evicted
/// registry so that a namespace's identity survives even if its gateway
/// wrapper is rebuilt for an unrelated reason — satisfying "a single
/// memory namespace maps to exactly one in-process map, shared across
/// gateway lookups within the supervisor lifetime" (spec.md §3).
pub struct GatewayFactory<G> {
    plugin_root: PathBuf,
    memory_backends: Mutex<HashMap<NamespaceName, Arc<MemoryBackend>>>,
    gateways: Mutex<HashMap<NamespaceName, CachedEntry<G>>>,
    build: Box<dyn Fn(Arc<dyn StorageBackend>) -> G + Send + Sync>,
}

impl<G: Send + Sync + 'static> GatewayFactory<G> {
    pub fn new(
        plugin_root: PathBuf,
        build: impl Fn(Arc<dyn StorageBackend>) -> G + Send + Sync + 'static,
    ) -> Self {
        Self {
            plugin_root,
            memory_backends: Mutex::new(HashMap::new()),
            gateways: Mutex::new(HashMap::new()),
            build: Box::new(build),
        }
    }

    /// Get (or build) the gateway for `namespace` under the given raw
    /// `persist` option value.
    pub async fn get(
        &self,
        namespace: &NamespaceName,
        persist_raw: Option<&str>,
    ) -> Result<Arc<G>, FactoryError> {
        let descriptor = PersistenceDescriptor::parse(persist_raw, &namespace.0)?;

        if let Some(cached) = self.gateways.lock().get(namespace) {
            if cached.descriptor == descriptor {
                return Ok(Arc::clone(&cached.gateway));
            }
        }

        let backend = self.build_backend(namespace, &descriptor).await?;
        let gateway = Arc::new((self.build)(backend));
        self.gateways
            .lock()
            .insert(namespace.clone(), CachedEntry { descriptor, gateway: Arc::clone(&gateway) });
        Ok(gateway)
    }

    async fn build_backend(
        &self,
        namespace: &NamespaceName,
        descriptor: &PersistenceDescriptor,
    ) -> Result<Arc<dyn StorageBackend>, FactoryError> {
        match descriptor {
            PersistenceDescriptor::Memory => {
                let mut backends = self.memory_backends.lock();
                let backend = backends
                    .entry(namespace.clone())
                    .or_insert_with(|| Arc::new(MemoryBackend::new()));
                Ok(Arc::clone(backend) as Arc<dyn StorageBackend>)
            }
            PersistenceDescriptor::Path { root, unsanitize } => {
                let dir = if root.is_absolute() {
                    root.clone()
                } else {
                    self.plugin_root.join(root).join(sanitize_namespace(&namespace.0))
                };
                Ok(Arc::new(FileBackend::open(dir, *unsanitize).await?) as Arc<dyn StorageBackend>)
            }
            PersistenceDescriptor::Sqlite(path) => {
                let path = if path.is_absolute() { path.clone() } else { self.plugin_root.join(path) };
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await.map_err(StorageError::Io)?;
                }
                Ok(Arc::new(SqliteBackend::open(&path, &namespace.0).await?) as Arc<dyn StorageBackend>)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn memory_backend_identity(&self, namespace: &NamespaceName) -> Option<usize> {
        self.memory_backends.lock().get(namespace).map(|b| Arc::as_ptr(b) as usize)
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
