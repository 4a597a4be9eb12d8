// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The stored shape of a cache entry (spec.md §3 "Cache entry"): metadata
//! lives in `StorageEntry::attributes`, the response body in its `value`.

use mf_wire::MultiHeaderMap;
use serde::{Deserialize, Serialize};

/// Metadata persisted alongside a cached response body.
///
/// `headers` is a flat `(name, value)` list rather than a map so repeated
/// `Set-Cookie` lines round-trip exactly; everything else was already
/// comma-joined by `MultiHeaderMap` before storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub size: u64,
    pub stored_at_secs: u64,
    pub ttl_secs: u64,
    /// Request header values (by lowercase name) recorded at `PUT` time for
    /// every header listed in the response's `Vary`, used to detect a
    /// varying `GET` (spec.md §4.4 Vary supplement).
    pub vary_snapshot: Vec<(String, String)>,
}

impl CacheMetadata {
    pub fn expires_at_secs(&self) -> u64 {
        self.stored_at_secs + self.ttl_secs
    }

    pub fn is_fresh(&self, now_secs: u64) -> bool {
        now_secs < self.expires_at_secs()
    }

    pub fn to_header_map(&self) -> MultiHeaderMap {
        let mut map = MultiHeaderMap::new();
        for (name, value) in &self.headers {
            map.insert(name, value.clone());
        }
        map
    }

    /// Does `request_headers` match the snapshot taken at `PUT` time for
    /// every varied header? An empty snapshot (no `Vary`) always matches.
    pub fn matches_vary(&self, request_headers: &MultiHeaderMap) -> bool {
        self.vary_snapshot
            .iter()
            .all(|(name, value)| request_headers.get(name).unwrap_or("") == value)
    }
}

/// Flatten a [`MultiHeaderMap`] into the list form `CacheMetadata` stores.
pub fn flatten_headers(headers: &MultiHeaderMap) -> Vec<(String, String)> {
    headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
