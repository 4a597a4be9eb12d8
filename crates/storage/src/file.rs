// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use crate::{backend::StorageBackend, entry::StorageEntry, error::StorageError};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory-backed storage. Each key is base64-encoded into a filename so
/// arbitrary key bytes round-trip exactly through `list`, unlike a
/// human-readable sanitized name which can collide or lose information.
///
/// The `unsanitize` flag (the `file:` persistence URL's `unsanitize` query
/// flag) switches to literal filenames instead, for callers that want to
/// browse the directory by hand and control key shapes themselves.
pub struct FileBackend {
    root: PathBuf,
    unsanitize: bool,
}

impl FileBackend {
    pub async fn open(root: impl Into<PathBuf>, unsanitize: bool) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root, unsanitize })
    }

    fn encode(&self, key: &str) -> String {
        if self.unsanitize {
            key.to_string()
        } else {
            URL_SAFE_NO_PAD.encode(key)
        }
    }

    fn decode(&self, encoded: &str) -> Option<String> {
        if self.unsanitize {
            Some(encoded.to_string())
        } else {
            let decoded = URL_SAFE_NO_PAD.decode(encoded).ok()?;
            String::from_utf8(decoded).ok()
        }
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.bin", self.encode(key)))
    }

    fn attrs_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.attrs.json", self.encode(key)))
    }

    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        let tmp = path.with_extension(format!(
            "{}.tmp",
            path.extension().and_then(|e| e.to_str()).unwrap_or("tmp")
        ));
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<StorageEntry>, StorageError> {
        let value_path = self.value_path(key);
        let value = match fs::read(&value_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let attrs_bytes = fs::read(self.attrs_path(key)).await.unwrap_or_else(|_| b"null".to_vec());
        let attributes = serde_json::from_slice(&attrs_bytes)
            .map_err(|source| StorageError::CorruptAttributes { key: key.to_string(), source })?;
        Ok(Some(StorageEntry::new(value, attributes)))
    }

    async fn put(&self, key: &str, entry: StorageEntry) -> Result<(), StorageError> {
        let attrs_bytes = serde_json::to_vec(&entry.attributes)
            .map_err(|source| StorageError::CorruptAttributes { key: key.to_string(), source })?;
        self.write_atomic(&self.value_path(key), &entry.value).await?;
        self.write_atomic(&self.attrs_path(key), &attrs_bytes).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let value_path = self.value_path(key);
        let existed = match fs::remove_file(&value_path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        let _ = fs::remove_file(self.attrs_path(key)).await;
        Ok(existed)
    }

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut dir = fs::read_dir(&self.root).await?;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let Some(encoded) = name.strip_suffix(".bin") else { continue };
            let Some(key) = self.decode(encoded) else { continue };
            let matches = match prefix {
                Some(p) => key.starts_with(p),
                None => true,
            };
            if matches {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
