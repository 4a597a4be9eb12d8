// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The stored shape of an R2 object (spec.md §4.5 "R2"): metadata lives in
//! `StorageEntry::attributes`, the object bytes in its `value`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpMetadata {
    pub content_type: Option<String>,
    pub content_language: Option<String>,
    pub content_disposition: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
    pub cache_expiry: Option<String>,
}

/// Caller-supplied checksums to verify at `put` time (spec.md §4.5 "records
/// MD5 and any caller-supplied SHA checksums"). Hex-encoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Checksums {
    pub md5: Option<String>,
    pub sha1: Option<String>,
    pub sha256: Option<String>,
}

/// The `onlyIf` conditional headers a `put` is gated on, evaluated against
/// the object currently stored at the key (if any).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PutConditional {
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub if_unmodified_since: Option<String>,
}

/// The JSON portion of a `put` request body (spec.md §6 "Wire format for R2
/// PUT"): `<metadata-json-bytes> || <object-bytes>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PutEnvelope {
    pub http_metadata: HttpMetadata,
    pub custom_metadata: BTreeMap<String, String>,
    pub checksums: Checksums,
    pub only_if: PutConditional,
}

/// Persisted metadata for one stored object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub key: String,
    pub size: u64,
    /// Hex MD5 of the object body, used as the ETag.
    pub etag: String,
    pub uploaded_at_secs: u64,
    pub http_metadata: HttpMetadata,
    pub custom_metadata: BTreeMap<String, String>,
    pub checksums: Checksums,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetConditional {
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub if_unmodified_since: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub etag: String,
    pub uploaded_at_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_metadata: Option<HttpMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub objects: Vec<ObjectSummary>,
    /// Common prefixes up to the first delimiter occurrence after the
    /// search prefix (spec.md §4.5 "delimitedPrefixes").
    pub delimited_prefixes: Vec<String>,
    pub truncated: bool,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub prefix: Option<String>,
    pub cursor: Option<String>,
    pub delimiter: Option<String>,
    pub limit: Option<usize>,
    pub start_after: Option<String>,
    pub include_http_metadata: bool,
    pub include_custom_metadata: bool,
}
