// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use crate::{backend::StorageBackend, entry::StorageEntry, error::StorageError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;

/// SQLite-backed storage. One pool per namespace, capped at a single
/// connection: SQLite serializes writers anyway and a single connection
/// avoids `SQLITE_BUSY` churn against the WAL-mode lock.
pub struct SqliteBackend {
    pool: SqlitePool,
    namespace: String,
}

impl SqliteBackend {
    pub async fn open(path: &Path, namespace: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .map_err(StorageError::Sqlite)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS storage (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value BLOB NOT NULL,
                attributes TEXT NOT NULL,
                PRIMARY KEY (namespace, key)
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool, namespace: namespace.to_string() })
    }
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    async fn get(&self, key: &str) -> Result<Option<StorageEntry>, StorageError> {
        let row = sqlx::query("SELECT value, attributes FROM storage WHERE namespace = ? AND key = ?")
            .bind(&self.namespace)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else { return Ok(None) };
        let value: Vec<u8> = row.try_get("value")?;
        let attrs_text: String = row.try_get("attributes")?;
        let attributes = serde_json::from_str(&attrs_text)
            .map_err(|source| StorageError::CorruptAttributes { key: key.to_string(), source })?;
        Ok(Some(StorageEntry::new(value, attributes)))
    }

    async fn put(&self, key: &str, entry: StorageEntry) -> Result<(), StorageError> {
        let attrs_text = serde_json::to_string(&entry.attributes)
            .map_err(|source| StorageError::CorruptAttributes { key: key.to_string(), source })?;
        sqlx::query(
            "INSERT INTO storage (namespace, key, value, attributes) VALUES (?, ?, ?, ?)
             ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value, attributes = excluded.attributes",
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(entry.value.as_ref())
        .bind(attrs_text)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM storage WHERE namespace = ? AND key = ?")
            .bind(&self.namespace)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        // Filter in Rust rather than with SQL LIKE: a literal prefix can
        // contain `%`/`_`, which LIKE would otherwise treat as wildcards.
        let rows = sqlx::query("SELECT key FROM storage WHERE namespace = ? ORDER BY key")
            .bind(&self.namespace)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|row| row.try_get::<String, _>("key").map_err(StorageError::from))
            .filter(|key| match (key, prefix) {
                (Ok(k), Some(p)) => k.starts_with(p),
                (Ok(_), None) => true,
                (Err(_), _) => true,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
