// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("key must be non-empty and at most 512 UTF-8 bytes, and not \".\" or \"..\"")]
    InvalidKey,
    #[error("expiration must be in the future")]
    ExpirationInPast,
    #[error("expirationTtl must be at least {min_secs} seconds")]
    TtlTooShort { min_secs: u64 },
    #[error("cannot set both expiration and expirationTtl")]
    ConflictingExpiration,
    #[error("value exceeds the maximum size of {max_bytes} bytes")]
    ValueTooLarge { max_bytes: u64 },
    #[error("metadata exceeds the maximum size of {max_bytes} bytes")]
    MetadataTooLarge { max_bytes: u64 },
    #[error("cursor is not valid base64")]
    InvalidCursor,
    #[error("storage error: {0}")]
    Storage(#[from] mf_storage::StorageError),
    #[error("gateway construction error: {0}")]
    Factory(#[from] mf_adapters::FactoryError),
}

impl From<KvError> for mf_adapters::HttpError {
    fn from(err: KvError) -> Self {
        match err {
            KvError::Storage(_) | KvError::Factory(_) => mf_adapters::HttpError::internal(err.to_string()),
            _ => mf_adapters::HttpError::bad_request(err.to_string()),
        }
    }
}
