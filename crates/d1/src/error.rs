// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use mf_adapters::HttpError;
use mf_core::persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum D1Error {
    #[error("statement returns rows; use query instead of execute")]
    RowReturningStatement,
    #[error("unsupported bind parameter at position {0}")]
    UnsupportedParam(usize),
    #[error("batch rolled back after statement {index}: {source}")]
    BatchFailed { index: usize, source: sqlx::Error },
    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("persistence configuration error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl D1Error {
    pub fn into_http_error(self) -> HttpError {
        match self {
            D1Error::RowReturningStatement | D1Error::UnsupportedParam(_) => {
                HttpError::bad_request(self.to_string())
            }
            D1Error::BatchFailed { .. } | D1Error::Sql(_) | D1Error::Persistence(_) | D1Error::Io(_) => {
                HttpError::internal(self.to_string())
            }
        }
    }
}
