// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The R2 gateway: `head`/`get`/`put`/`delete`/`list` (spec.md §4.5 "R2").

use crate::entry::{
    Checksums, GetConditional, HttpMetadata, ListOptions, ListResult, ObjectMetadata, ObjectSummary,
    PutConditional,
};
use crate::error::R2Error;
use crate::limits::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, MAX_OBJECT_BYTES};
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use md5::{Digest, Md5};
use mf_core::Clock;
use mf_storage::{StorageBackend, StorageEntry};
use sha2::Sha256;
use std::collections::BTreeMap;
use std::sync::Arc;

pub enum GetOutcome {
    Found { meta: ObjectMetadata, body: Bytes },
    NotModified { meta: ObjectMetadata },
    PreconditionFailed { meta: ObjectMetadata },
    NotFound,
}

pub struct R2Gateway<C: Clock> {
    backend: Arc<dyn StorageBackend>,
    clock: C,
}

impl<C: Clock> R2Gateway<C> {
    pub fn new(backend: Arc<dyn StorageBackend>, clock: C) -> Self {
        Self { backend, clock }
    }

    async fn load(&self, key: &str) -> Result<Option<(ObjectMetadata, Bytes)>, R2Error> {
        let Some(entry) = self.backend.get(key).await? else { return Ok(None) };
        let meta: ObjectMetadata = serde_json::from_value(entry.attributes)
            .map_err(|e| R2Error::MalformedEnvelope(e.to_string()))?;
        Ok(Some((meta, entry.value)))
    }

    pub async fn head(&self, key: &str) -> Result<Option<ObjectMetadata>, R2Error> {
        Ok(self.load(key).await?.map(|(meta, _)| meta))
    }

    pub async fn get(&self, key: &str, conditional: &GetConditional) -> Result<GetOutcome, R2Error> {
        let Some((meta, body)) = self.load(key).await? else { return Ok(GetOutcome::NotFound) };

        let mut skip_dates = false;
        if let Some(if_match) = &conditional.if_match {
            if !etag_list_matches(if_match, &meta.etag) {
                return Ok(GetOutcome::PreconditionFailed { meta });
            }
            skip_dates = true;
        }
        if let Some(if_none_match) = &conditional.if_none_match {
            if etag_list_matches(if_none_match, &meta.etag) {
                return Ok(GetOutcome::NotModified { meta });
            }
        }
        if !skip_dates {
            if let Some(since) = &conditional.if_unmodified_since {
                if !at_or_before(meta.uploaded_at_secs, since) {
                    return Ok(GetOutcome::PreconditionFailed { meta });
                }
            }
            if let Some(since) = &conditional.if_modified_since {
                if at_or_before(meta.uploaded_at_secs, since) {
                    return Ok(GetOutcome::NotModified { meta });
                }
            }
        }

        Ok(GetOutcome::Found { meta, body })
    }

    pub async fn put(
        &self,
        key: &str,
        body: Bytes,
        http_metadata: HttpMetadata,
        custom_metadata: BTreeMap<String, String>,
        checksums: Checksums,
        conditional: &PutConditional,
    ) -> Result<ObjectMetadata, R2Error> {
        if body.len() as u64 > MAX_OBJECT_BYTES {
            return Err(R2Error::BodyTooLarge { max_bytes: MAX_OBJECT_BYTES });
        }

        let existing = self.load(key).await?.map(|(meta, _)| meta);
        if !evaluate_put_conditional(existing.as_ref(), conditional) {
            return Err(R2Error::PreconditionFailed { existing: existing.map(Box::new) });
        }

        let md5_hex = hex::encode(Md5::digest(&body));
        if let Some(expected) = &checksums.md5 {
            if !expected.eq_ignore_ascii_case(&md5_hex) {
                return Err(R2Error::ChecksumMismatch { algorithm: "md5" });
            }
        }
        if let Some(expected) = &checksums.sha256 {
            let actual = hex::encode(Sha256::digest(&body));
            if !expected.eq_ignore_ascii_case(&actual) {
                return Err(R2Error::ChecksumMismatch { algorithm: "sha256" });
            }
        }

        let meta = ObjectMetadata {
            key: key.to_string(),
            size: body.len() as u64,
            etag: md5_hex,
            uploaded_at_secs: self.clock.epoch_secs(),
            http_metadata,
            custom_metadata,
            checksums,
        };
        let attributes = serde_json::to_value(&meta).map_err(|e| R2Error::MalformedEnvelope(e.to_string()))?;
        self.backend.put(key, StorageEntry::new(body, attributes)).await?;
        Ok(meta)
    }

    /// Delete up to 1000 keys; missing keys are silently ignored
    /// (idempotent), matching spec.md §4.5's batch-delete contract.
    pub async fn delete(&self, keys: &[String]) -> Result<(), R2Error> {
        for key in keys {
            self.backend.delete(key).await?;
        }
        Ok(())
    }

    pub async fn list(&self, opts: ListOptions) -> Result<ListResult, R2Error> {
        let limit = opts.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
        let mut keys = self.backend.list(opts.prefix.as_deref()).await?;
        keys.sort();

        if let Some(after) = &opts.start_after {
            keys.retain(|k| k.as_str() > after.as_str());
        }
        if let Some(cursor) = &opts.cursor {
            let after = decode_cursor(cursor)?;
            keys.retain(|k| k.as_str() > after.as_str());
        }

        let prefix_len = opts.prefix.as_deref().unwrap_or("").len();
        let mut objects = Vec::new();
        let mut delimited_prefixes = Vec::new();
        let mut truncated = false;
        let mut last_key = None;

        for key in keys {
            if objects.len() + delimited_prefixes.len() >= limit {
                truncated = true;
                break;
            }
            last_key = Some(key.clone());

            if let Some(delim) = &opts.delimiter {
                let rest = &key[prefix_len.min(key.len())..];
                if let Some(idx) = rest.find(delim.as_str()) {
                    let common = format!("{}{}{}", &key[..prefix_len.min(key.len())], &rest[..idx], delim);
                    if !delimited_prefixes.contains(&common) {
                        delimited_prefixes.push(common);
                    }
                    continue;
                }
            }

            let (meta, _) = self.load(&key).await?.ok_or(R2Error::NotFound)?;
            objects.push(ObjectSummary {
                key: meta.key,
                size: meta.size,
                etag: meta.etag,
                uploaded_at_secs: meta.uploaded_at_secs,
                http_metadata: opts.include_http_metadata.then_some(meta.http_metadata),
                custom_metadata: opts.include_custom_metadata.then_some(meta.custom_metadata),
            });
        }

        let cursor = if truncated { last_key.map(|k| encode_cursor(&k)) } else { None };
        Ok(ListResult { objects, delimited_prefixes, truncated, cursor })
    }
}

fn etag_list_matches(list: &str, etag: &str) -> bool {
    if list.trim() == "*" {
        return true;
    }
    list.split(',').any(|candidate| strip_quotes(candidate.trim()) == etag)
}

fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(s)
}

/// Is `uploaded_at_secs` at or before `http_date`, truncated to one-second
/// granularity as R2 does (spec.md §4.5 "R2").
fn at_or_before(uploaded_at_secs: u64, http_date: &str) -> bool {
    let Ok(parsed) = httpdate::parse_http_date(http_date) else { return false };
    let since_secs =
        parsed.duration_since(std::time::UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
    uploaded_at_secs <= since_secs
}

fn evaluate_put_conditional(existing: Option<&ObjectMetadata>, conditional: &PutConditional) -> bool {
    if let Some(if_match) = &conditional.if_match {
        let matched = existing.is_some_and(|m| etag_list_matches(if_match, &m.etag));
        if !matched {
            return false;
        }
    }
    if let Some(if_none_match) = &conditional.if_none_match {
        if if_none_match.trim() == "*" && existing.is_some() {
            return false;
        }
        if let Some(existing) = existing {
            if etag_list_matches(if_none_match, &existing.etag) {
                return false;
            }
        }
    }
    if let Some(since) = &conditional.if_unmodified_since {
        if let Some(existing) = existing {
            if !at_or_before(existing.uploaded_at_secs, since) {
                return false;
            }
        }
    }
    if let Some(since) = &conditional.if_modified_since {
        if let Some(existing) = existing {
            if at_or_before(existing.uploaded_at_secs, since) {
                return false;
            }
        }
    }
    true
}

fn encode_cursor(key: &str) -> String {
    STANDARD.encode(key.as_bytes())
}

fn decode_cursor(cursor: &str) -> Result<String, R2Error> {
    let bytes = STANDARD
        .decode(cursor)
        .map_err(|_| R2Error::MalformedEnvelope("cursor is not valid base64".to_string()))?;
    String::from_utf8(bytes).map_err(|_| R2Error::MalformedEnvelope("cursor is not valid utf-8".to_string()))
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
