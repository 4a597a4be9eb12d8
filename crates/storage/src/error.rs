// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] sqlx::Error),
    #[error("corrupt attributes for key {key:?}: {source}")]
    CorruptAttributes { key: String, source: serde_json::Error },
}
