// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use crate::{error::StorageError, entry::StorageEntry};
use async_trait::async_trait;

/// Uniform key/value storage contract implemented by each persistence
/// backend (memory, file, sqlite). Gateways hold a `Box<dyn StorageBackend>`
/// and never know which concrete backend they were handed.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<StorageEntry>, StorageError>;

    async fn put(&self, key: &str, entry: StorageEntry) -> Result<(), StorageError>;

    /// Returns whether a value was actually removed.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// List keys, optionally restricted to a prefix. Ordering is
    /// lexicographic by key, matching what the KV and R2 gateways need for
    /// their own cursor-based pagination.
    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError>;
}
