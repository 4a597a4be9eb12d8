// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored alongside a KV value in `StorageEntry::attributes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvMetadata {
    /// Absolute expiration, epoch seconds. `None` means the entry never
    /// expires.
    pub expiration_secs: Option<u64>,
    pub metadata: Option<Value>,
}

impl KvMetadata {
    pub fn is_expired(&self, now_secs: u64) -> bool {
        self.expiration_secs.is_some_and(|exp| now_secs >= exp)
    }
}

/// Caller input to `put`: exactly one of `expiration`/`expiration_ttl` may
/// be set.
#[derive(Debug, Clone, Default)]
pub struct PutRequest {
    pub expiration_secs: Option<u64>,
    pub expiration_ttl_secs: Option<u64>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyInfo {
    pub name: String,
    pub expiration: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub keys: Vec<KeyInfo>,
    pub list_complete: bool,
    pub cursor: Option<String>,
}
