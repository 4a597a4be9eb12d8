// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Parsing of the `persist` option accepted by every storage-backed plugin.
//!
//! Each gateway (cache, KV, R2, D1) accepts a `persist` value that is either
//! absent, a boolean, a bare path string, or a URL. This module centralizes
//! that parsing so all four gateways agree on the same rules.

use crate::sanitize::sanitize_namespace;
use std::path::PathBuf;
use thiserror::Error;

/// Where a namespace's data should live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceDescriptor {
    /// In-process, lost on restart. The default when `persist` is absent or `false`.
    Memory,
    /// Backed by files under the given directory. `unsanitize` requests
    /// literal (unencoded) filenames instead of the default base64 encoding.
    Path { root: PathBuf, unsanitize: bool },
    /// Backed by a SQLite database at the given path.
    Sqlite(PathBuf),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("unsupported persistence scheme: {0}")]
    UnsupportedScheme(String),
    #[error("file URL must have a path component")]
    MissingFilePath,
}

impl PersistenceDescriptor {
    /// Parse a raw `persist` option value.
    ///
    /// - `None` or `Some("false")` → [`PersistenceDescriptor::Memory`]
    /// - `Some("true")` → a default on-disk directory named after the namespace
    /// - a bare path string → [`PersistenceDescriptor::Path`], sanitized
    /// - a `file:` URL → [`PersistenceDescriptor::Path`], with an optional
    ///   `unsanitize` query flag requesting literal filenames
    /// - a `sqlite:` URL → [`PersistenceDescriptor::Sqlite`]
    /// - any other URL scheme → [`PersistenceError::UnsupportedScheme`]
    pub fn parse(raw: Option<&str>, namespace: &str) -> Result<Self, PersistenceError> {
        let raw = match raw {
            None => return Ok(PersistenceDescriptor::Memory),
            Some(r) => r,
        };

        if raw == "false" {
            return Ok(PersistenceDescriptor::Memory);
        }
        if raw == "true" {
            return Ok(PersistenceDescriptor::Path {
                root: PathBuf::from(sanitize_namespace(namespace)),
                unsanitize: false,
            });
        }

        if let Ok(url) = url::Url::parse(raw) {
            return match url.scheme() {
                "file" => {
                    let unsanitize = url.query_pairs().any(|(k, v)| k == "unsanitize" && v != "false");
                    let path = url.to_file_path().map_err(|_| PersistenceError::MissingFilePath)?;
                    Ok(PersistenceDescriptor::Path { root: path, unsanitize })
                }
                "sqlite" => {
                    let path = url.path();
                    if path.is_empty() {
                        return Err(PersistenceError::MissingFilePath);
                    }
                    Ok(PersistenceDescriptor::Sqlite(PathBuf::from(path)))
                }
                other => Err(PersistenceError::UnsupportedScheme(other.to_string())),
            };
        }

        // Bare path, not a recognized URL.
        Ok(PersistenceDescriptor::Path { root: PathBuf::from(raw), unsanitize: false })
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, PersistenceDescriptor::Memory)
    }
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
