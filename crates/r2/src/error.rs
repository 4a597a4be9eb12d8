// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! R2 errors, rendered as the version-1 JSON envelope spec.md §4.5 "R2"
//! describes rather than the generic `mf_adapters::HttpError` text body the
//! other gateways use.

use crate::entry::ObjectMetadata;
use mf_wire::UniversalResponse;
use thiserror::Error;

/// Header carrying the byte length of the error envelope JSON, present
/// only when a metadata blob for the conflicting object follows it in the
/// body (spec.md §4.5 "a response header carrying the metadata size").
pub const ERROR_METADATA_SIZE_HEADER: &str = "cf-r2-error-metadata-size";

#[derive(Debug, Error)]
pub enum R2Error {
    #[error("object not found")]
    NotFound,
    #[error("object exceeds the maximum size of {max_bytes} bytes")]
    BodyTooLarge { max_bytes: u64 },
    #[error("checksum mismatch for algorithm {algorithm}")]
    ChecksumMismatch { algorithm: &'static str },
    #[error("precondition failed")]
    PreconditionFailed { existing: Option<Box<ObjectMetadata>> },
    #[error("batch delete accepts at most {max} keys")]
    BatchTooLarge { max: usize },
    #[error("malformed put envelope: {0}")]
    MalformedEnvelope(String),
    #[error("storage error: {0}")]
    Storage(#[from] mf_storage::StorageError),
    #[error("gateway construction error: {0}")]
    Factory(#[from] mf_adapters::FactoryError),
}

impl R2Error {
    fn code(&self) -> &'static str {
        match self {
            R2Error::NotFound => "NoSuchKey",
            R2Error::BodyTooLarge { .. } => "EntityTooLarge",
            R2Error::ChecksumMismatch { .. } => "BadDigest",
            R2Error::PreconditionFailed { .. } => "PreconditionFailed",
            R2Error::BatchTooLarge { .. } => "InvalidArgument",
            R2Error::MalformedEnvelope(_) => "InvalidArgument",
            R2Error::Storage(_) | R2Error::Factory(_) => "InternalError",
        }
    }

    fn status(&self) -> u16 {
        match self {
            R2Error::NotFound => 404,
            R2Error::BodyTooLarge { .. } => 413,
            R2Error::ChecksumMismatch { .. } | R2Error::MalformedEnvelope(_) => 400,
            R2Error::PreconditionFailed { .. } => 412,
            R2Error::BatchTooLarge { .. } => 400,
            R2Error::Storage(_) | R2Error::Factory(_) => 500,
        }
    }

    /// Convert to the generic loopback error type, for plumbing failures
    /// (gateway construction, storage I/O) that don't need the R2-specific
    /// JSON envelope a caller would parse for retry logic.
    pub fn into_http_error(self) -> mf_adapters::HttpError {
        mf_adapters::HttpError::new(self.status(), self.code(), self.to_string())
    }

    /// Render the `{version: 1, code, message}` envelope, appending the
    /// conflicting object's metadata after it when present and recording
    /// the split point in `ERROR_METADATA_SIZE_HEADER`.
    pub fn into_response(self) -> UniversalResponse {
        let status = self.status();
        let envelope = serde_json::json!({
            "version": 1,
            "code": self.code(),
            "message": self.to_string(),
        });
        let mut body = serde_json::to_vec(&envelope).unwrap_or_default();
        let mut resp = UniversalResponse::new(status).with_header("content-type", "application/json");
        if let R2Error::PreconditionFailed { existing: Some(meta) } = &self {
            let envelope_len = body.len();
            if let Ok(meta_bytes) = serde_json::to_vec(meta) {
                body.extend_from_slice(&meta_bytes);
                resp = resp.with_header(ERROR_METADATA_SIZE_HEADER, envelope_len.to_string());
            }
        }
        resp.with_body(body)
    }
}
