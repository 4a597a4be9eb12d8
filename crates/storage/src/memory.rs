// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use crate::{backend::StorageBackend, entry::StorageEntry, error::StorageError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// In-process backend. The default when a namespace has no `persist` option.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, StorageEntry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<StorageEntry>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn put(&self, key: &str, entry: StorageEntry) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        let guard = self.entries.lock();
        let keys = match prefix {
            Some(p) => guard.keys().filter(|k| k.starts_with(p)).cloned().collect(),
            None => guard.keys().cloned().collect(),
        };
        Ok(keys)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
