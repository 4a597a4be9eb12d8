// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use bytes::Bytes;
use serde_json::Value;

/// A stored value plus gateway-defined metadata.
///
/// `attributes` carries whatever the owning gateway needs at read time:
/// the cache gateway stores response headers and status there, KV stores
/// expiration and user metadata, R2 stores the full object-metadata
/// envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEntry {
    pub value: Bytes,
    pub attributes: Value,
}

impl StorageEntry {
    pub fn new(value: impl Into<Bytes>, attributes: Value) -> Self {
        Self { value: value.into(), attributes }
    }
}
