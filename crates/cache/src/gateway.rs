// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The cache gateway: `PUT`/`GET`/`DELETE` per cache key (spec.md §4.4).

use crate::conditional::{if_none_match_matches, is_not_modified_since};
use crate::entry::{flatten_headers, CacheMetadata};
use crate::error::CacheError;
use crate::freshness;
use crate::parser;
use crate::range::{self, RangeParse};
use bytes::{Bytes, BytesMut};
use http::Method;
use mf_core::Clock;
use mf_storage::{StorageBackend, StorageEntry};
use mf_wire::{MultiHeaderMap, ResponseBody, UniversalResponse};
use std::sync::Arc;
use uuid::Uuid;

/// Requests under this path prefix bypass the cache entirely (spec.md
/// §4.4 "Sites bypass").
pub const SITES_BYPASS_PREFIX: &str = "/.mf/sites";

pub const CACHE_STATUS_HEADER: &str = "cf-cache-status";

pub enum PutOutcome {
    Stored,
    NotStorable,
    Bypassed,
}

impl PutOutcome {
    pub fn into_response(self) -> UniversalResponse {
        match self {
            PutOutcome::Stored => UniversalResponse::new(204),
            PutOutcome::NotStorable => UniversalResponse::new(204),
            PutOutcome::Bypassed => UniversalResponse::new(204),
        }
    }
}

pub struct CacheGateway<C: Clock> {
    backend: Arc<dyn StorageBackend>,
    clock: C,
}

impl<C: Clock> CacheGateway<C> {
    pub fn new(backend: Arc<dyn StorageBackend>, clock: C) -> Self {
        Self { backend, clock }
    }

    pub async fn put(
        &self,
        key: &str,
        raw_response: Bytes,
        request_headers: &MultiHeaderMap,
    ) -> Result<PutOutcome, CacheError> {
        if key.starts_with(SITES_BYPASS_PREFIX) {
            return Ok(PutOutcome::Bypassed);
        }

        let parsed = parser::parse(&raw_response)?;
        let vary_names = vary_header_names(&parsed.headers);
        if vary_names.iter().any(|n| n == "*") {
            return Ok(PutOutcome::NotStorable);
        }

        let decision = freshness::evaluate(&parsed.headers, self.clock.epoch_secs());
        if !decision.storable {
            return Ok(PutOutcome::NotStorable);
        }

        let mut headers = parsed.headers;
        if decision.strip_set_cookie {
            headers.remove("set-cookie");
        }

        let vary_snapshot = vary_names
            .iter()
            .map(|name| (name.clone(), request_headers.get(name).unwrap_or("").to_string()))
            .collect();

        let metadata = CacheMetadata {
            status: parsed.status,
            headers: flatten_headers(&headers),
            size: parsed.body.len() as u64,
            stored_at_secs: self.clock.epoch_secs(),
            ttl_secs: decision.ttl_secs,
            vary_snapshot,
        };
        let attributes = serde_json::to_value(&metadata)
            .map_err(|e| CacheError::CorruptEntry { key: key.to_string(), reason: e.to_string() })?;
        self.backend.put(key, StorageEntry::new(parsed.body, attributes)).await?;
        Ok(PutOutcome::Stored)
    }

    pub async fn get(
        &self,
        key: &str,
        method: &Method,
        request_headers: &MultiHeaderMap,
    ) -> Result<UniversalResponse, CacheError> {
        if key.starts_with(SITES_BYPASS_PREFIX) {
            return Ok(miss());
        }

        let Some(stored) = self.backend.get(key).await? else { return Ok(miss()) };
        let metadata: CacheMetadata = serde_json::from_value(stored.attributes.clone())
            .map_err(|e| CacheError::CorruptEntry { key: key.to_string(), reason: e.to_string() })?;

        if !metadata.matches_vary(request_headers) || !metadata.is_fresh(self.clock.epoch_secs()) {
            return Ok(miss());
        }

        let headers = metadata.to_header_map();

        if let Some(if_none_match) = request_headers.get("if-none-match") {
            if if_none_match_matches(if_none_match, headers.get("etag")) {
                return Ok(not_modified(headers));
            }
        } else if let (Some(since), Some(last_modified)) =
            (request_headers.get("if-modified-since"), headers.get("last-modified"))
        {
            if is_not_modified_since(last_modified, since) {
                return Ok(not_modified(headers));
            }
        }

        if *method == Method::HEAD {
            return Ok(hit(headers, ResponseBody::Empty, metadata.status));
        }

        if let Some(range_header) = request_headers.get("range") {
            return Ok(self.ranged_hit(&stored.value, headers, metadata.status, range_header));
        }

        Ok(hit(headers, ResponseBody::Bytes(stored.value), metadata.status))
    }

    fn ranged_hit(
        &self,
        body: &Bytes,
        mut headers: MultiHeaderMap,
        status: u16,
        range_header: &str,
    ) -> UniversalResponse {
        let length = body.len() as u64;
        match range::parse(range_header, length) {
            RangeParse::Full => hit(headers, ResponseBody::Bytes(body.clone()), status),
            RangeParse::Unsatisfiable => {
                headers.insert("content-range", format!("bytes */{length}"));
                headers.insert(CACHE_STATUS_HEADER, "HIT");
                UniversalResponse { status: 416, headers, body: ResponseBody::Empty }
            }
            RangeParse::Ranges(ranges) if ranges.len() == 1 => {
                let r = ranges[0];
                let slice = body.slice(r.start as usize..=r.end as usize);
                headers.insert("content-range", format!("bytes {}-{}/{length}", r.start, r.end));
                headers.insert(CACHE_STATUS_HEADER, "HIT");
                UniversalResponse { status: 206, headers, body: ResponseBody::Bytes(slice) }
            }
            RangeParse::Ranges(ranges) => {
                let content_type = headers.get("content-type").unwrap_or("application/octet-stream").to_string();
                let boundary = Uuid::new_v4().simple().to_string();
                let multipart = build_multipart(body, &ranges, &content_type, &boundary);
                headers.remove("content-range");
                headers.insert("content-type", format!("multipart/byteranges; boundary={boundary}"));
                headers.insert(CACHE_STATUS_HEADER, "HIT");
                UniversalResponse { status: 206, headers, body: ResponseBody::Bytes(multipart) }
            }
        }
    }

    pub async fn purge(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.backend.delete(key).await?)
    }
}

fn vary_header_names(headers: &MultiHeaderMap) -> Vec<String> {
    headers
        .get("vary")
        .map(|v| v.split(',').map(|n| n.trim().to_ascii_lowercase()).collect())
        .unwrap_or_default()
}

fn miss() -> UniversalResponse {
    let mut headers = MultiHeaderMap::new();
    headers.insert(CACHE_STATUS_HEADER, "MISS");
    UniversalResponse { status: 504, headers, body: ResponseBody::Empty }
}

fn not_modified(mut headers: MultiHeaderMap) -> UniversalResponse {
    headers.insert(CACHE_STATUS_HEADER, "HIT");
    UniversalResponse { status: 304, headers, body: ResponseBody::Empty }
}

fn hit(mut headers: MultiHeaderMap, body: ResponseBody, status: u16) -> UniversalResponse {
    headers.insert(CACHE_STATUS_HEADER, "HIT");
    UniversalResponse { status, headers, body }
}

fn build_multipart(body: &Bytes, ranges: &[range::ByteRange], content_type: &str, boundary: &str) -> Bytes {
    let mut out = BytesMut::new();
    for r in ranges {
        out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        out.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        out.extend_from_slice(
            format!("Content-Range: bytes {}-{}/{}\r\n\r\n", r.start, r.end, body.len()).as_bytes(),
        );
        out.extend_from_slice(&body[r.start as usize..=r.end as usize]);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    out.freeze()
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
