// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The KV gateway: `get`/`put`/`delete`/`list` (spec.md §4.5 "KV").

use crate::entry::{KeyInfo, KvMetadata, ListResult, PutRequest};
use crate::error::KvError;
use crate::limits::{self, MAX_LIST_LIMIT, MAX_METADATA_BYTES, MAX_VALUE_BYTES, MIN_TTL_SECS};
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use mf_core::Clock;
use mf_storage::{StorageBackend, StorageEntry};
use serde_json::Value;
use std::sync::Arc;

pub struct KvGateway<C: Clock> {
    backend: Arc<dyn StorageBackend>,
    clock: C,
}

impl<C: Clock> KvGateway<C> {
    pub fn new(backend: Arc<dyn StorageBackend>, clock: C) -> Self {
        Self { backend, clock }
    }

    pub async fn get(&self, key: &str) -> Result<Option<(Bytes, Option<Value>)>, KvError> {
        limits::validate_key(key)?;
        let Some(stored) = self.backend.get(key).await? else { return Ok(None) };
        let metadata: KvMetadata = serde_json::from_value(stored.attributes).unwrap_or(KvMetadata {
            expiration_secs: None,
            metadata: None,
        });
        if metadata.is_expired(self.clock.epoch_secs()) {
            self.backend.delete(key).await?;
            return Ok(None);
        }
        Ok(Some((stored.value, metadata.metadata)))
    }

    pub async fn put(&self, key: &str, value: Bytes, request: PutRequest) -> Result<(), KvError> {
        limits::validate_key(key)?;
        if value.len() as u64 > MAX_VALUE_BYTES {
            return Err(KvError::ValueTooLarge { max_bytes: MAX_VALUE_BYTES });
        }
        if let Some(metadata) = &request.metadata {
            let size = serde_json::to_vec(metadata).map(|b| b.len() as u64).unwrap_or(0);
            if size > MAX_METADATA_BYTES {
                return Err(KvError::MetadataTooLarge { max_bytes: MAX_METADATA_BYTES });
            }
        }

        let expiration_secs = self.resolve_expiration(&request)?;

        let metadata = KvMetadata { expiration_secs, metadata: request.metadata };
        let attributes = serde_json::to_value(&metadata).unwrap_or(Value::Null);
        self.backend.put(key, StorageEntry::new(value, attributes)).await?;
        Ok(())
    }

    fn resolve_expiration(&self, request: &PutRequest) -> Result<Option<u64>, KvError> {
        match (request.expiration_secs, request.expiration_ttl_secs) {
            (Some(_), Some(_)) => Err(KvError::ConflictingExpiration),
            (Some(exp), None) => {
                if exp <= self.clock.epoch_secs() {
                    return Err(KvError::ExpirationInPast);
                }
                Ok(Some(exp))
            }
            (None, Some(ttl)) => {
                if ttl < MIN_TTL_SECS {
                    return Err(KvError::TtlTooShort { min_secs: MIN_TTL_SECS });
                }
                Ok(Some(self.clock.epoch_secs() + ttl))
            }
            (None, None) => Ok(None),
        }
    }

    pub async fn delete(&self, key: &str) -> Result<bool, KvError> {
        limits::validate_key(key)?;
        Ok(self.backend.delete(key).await?)
    }

    pub async fn list(
        &self,
        prefix: Option<&str>,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<ListResult, KvError> {
        let limit = limit.unwrap_or(limits::DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
        let after = match cursor {
            Some(c) => Some(decode_cursor(c)?),
            None => None,
        };

        let mut keys = self.backend.list(prefix).await?;
        keys.sort();
        if let Some(after) = &after {
            keys.retain(|k| k > after);
        }

        let now = self.clock.epoch_secs();
        let mut infos = Vec::new();
        let mut exhausted = true;
        for key in keys.iter() {
            if infos.len() >= limit {
                exhausted = false;
                break;
            }
            if let Some(stored) = self.backend.get(key).await? {
                let metadata: KvMetadata =
                    serde_json::from_value(stored.attributes).unwrap_or(KvMetadata {
                        expiration_secs: None,
                        metadata: None,
                    });
                if metadata.is_expired(now) {
                    continue;
                }
                infos.push(KeyInfo { name: key.clone(), expiration: metadata.expiration_secs });
            }
        }

        let cursor = if exhausted { None } else { infos.last().map(|k| encode_cursor(&k.name)) };
        let list_complete = cursor.is_none();

        Ok(ListResult { keys: infos, list_complete, cursor })
    }
}

fn encode_cursor(key: &str) -> String {
    STANDARD.encode(key.as_bytes())
}

fn decode_cursor(cursor: &str) -> Result<String, KvError> {
    let bytes = STANDARD.decode(cursor).map_err(|_| KvError::InvalidCursor)?;
    String::from_utf8(bytes).map_err(|_| KvError::InvalidCursor)
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
