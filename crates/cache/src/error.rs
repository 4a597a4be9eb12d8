// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("storage error: {0}")]
    Storage(#[from] mf_storage::StorageError),
    #[error("gateway construction error: {0}")]
    Factory(#[from] mf_adapters::FactoryError),
    #[error("malformed cached entry for key {key:?}: {reason}")]
    CorruptEntry { key: String, reason: String },
    #[error("could not parse the raw HTTP response body supplied for storage: {0}")]
    MalformedResponse(String),
}

impl From<CacheError> for mf_adapters::HttpError {
    fn from(err: CacheError) -> Self {
        mf_adapters::HttpError::internal(err.to_string())
    }
}
