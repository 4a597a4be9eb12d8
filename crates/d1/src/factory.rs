// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Per-namespace SQLite pool construction and caching for D1, mirroring
//! [`mf_adapters::GatewayFactory`]'s persistence-aware caching but building
//! a raw [`SqlitePool`] instead of a generic key/value [`StorageBackend`],
//! since D1 runs arbitrary SQL against user-defined tables rather than the
//! fixed `storage` table the other gateways share.

use crate::error::D1Error;
use crate::gateway::D1Gateway;
use mf_core::sanitize::sanitize_namespace;
use mf_core::{NamespaceName, PersistenceDescriptor};
use parking_lot::Mutex;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

struct CachedEntry {
    descriptor: PersistenceDescriptor,
    gateway: Arc<D1Gateway>,
}

pub struct D1Factory {
    plugin_root: PathBuf,
    gateways: Mutex<HashMap<NamespaceName, CachedEntry>>,
}

impl D1Factory {
    pub fn new(plugin_root: PathBuf) -> Self {
        Self { plugin_root, gateways: Mutex::new(HashMap::new()) }
    }

    pub async fn get(
        &self,
        namespace: &NamespaceName,
        persist_raw: Option<&str>,
    ) -> Result<Arc<D1Gateway>, D1Error> {
        let descriptor = PersistenceDescriptor::parse(persist_raw, &namespace.0)?;

        if let Some(cached) = self.gateways.lock().get(namespace) {
            if cached.descriptor == descriptor {
                return Ok(Arc::clone(&cached.gateway));
            }
        }

        let gateway = Arc::new(self.build(namespace, &descriptor).await?);
        self.gateways
            .lock()
            .insert(namespace.clone(), CachedEntry { descriptor, gateway: Arc::clone(&gateway) });
        Ok(gateway)
    }

    async fn build(
        &self,
        namespace: &NamespaceName,
        descriptor: &PersistenceDescriptor,
    ) -> Result<D1Gateway, D1Error> {
        match descriptor {
            PersistenceDescriptor::Memory => {
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect("sqlite::memory:")
                    .await?;
                Ok(D1Gateway::new(pool, None))
            }
            PersistenceDescriptor::Path { root, .. } => {
                let dir = if root.is_absolute() {
                    root.clone()
                } else {
                    self.plugin_root.join(root).join(sanitize_namespace(&namespace.0))
                };
                tokio::fs::create_dir_all(&dir).await?;
                let file = dir.join("db.sqlite");
                self.open_file(file).await
            }
            PersistenceDescriptor::Sqlite(path) => {
                let file = if path.is_absolute() { path.clone() } else { self.plugin_root.join(path) };
                if let Some(parent) = file.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                self.open_file(file).await
            }
        }
    }

    async fn open_file(&self, path: PathBuf) -> Result<D1Gateway, D1Error> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await?;
        Ok(D1Gateway::new(pool, Some(path)))
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
