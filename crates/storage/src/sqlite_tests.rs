// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;
use serde_json::json;
use tempfile::tempdir;

#[tokio::test]
async fn put_then_get_round_trips() {
    let dir = tempdir().unwrap();
    let backend = SqliteBackend::open(&dir.path().join("test.db"), "ns").await.unwrap();
    backend.put("a", StorageEntry::new(&b"hello"[..], json!({"n": 1}))).await.unwrap();
    let entry = backend.get("a").await.unwrap().unwrap();
    assert_eq!(entry.value.as_ref(), b"hello");
    assert_eq!(entry.attributes, json!({"n": 1}));
}

#[tokio::test]
async fn put_overwrites_existing_key() {
    let dir = tempdir().unwrap();
    let backend = SqliteBackend::open(&dir.path().join("test.db"), "ns").await.unwrap();
    backend.put("a", StorageEntry::new(&b"v1"[..], json!(null))).await.unwrap();
    backend.put("a", StorageEntry::new(&b"v2"[..], json!(null))).await.unwrap();
    let entry = backend.get("a").await.unwrap().unwrap();
    assert_eq!(entry.value.as_ref(), b"v2");
}

#[tokio::test]
async fn delete_reports_whether_something_was_removed() {
    let dir = tempdir().unwrap();
    let backend = SqliteBackend::open(&dir.path().join("test.db"), "ns").await.unwrap();
    backend.put("a", StorageEntry::new(&b"x"[..], json!(null))).await.unwrap();
    assert!(backend.delete("a").await.unwrap());
    assert!(!backend.delete("a").await.unwrap());
}

#[tokio::test]
async fn list_filters_by_prefix_with_wildcard_like_chars() {
    let dir = tempdir().unwrap();
    let backend = SqliteBackend::open(&dir.path().join("test.db"), "ns").await.unwrap();
    for k in ["a%1", "a%2", "b"] {
        backend.put(k, StorageEntry::new(&b""[..], json!(null))).await.unwrap();
    }
    let keys = backend.list(Some("a%")).await.unwrap();
    assert_eq!(keys, vec!["a%1".to_string(), "a%2".to_string()]);
}

#[tokio::test]
async fn namespaces_are_isolated_within_the_same_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shared.db");
    let a = SqliteBackend::open(&path, "ns-a").await.unwrap();
    let b = SqliteBackend::open(&path, "ns-b").await.unwrap();
    a.put("k", StorageEntry::new(&b"from-a"[..], json!(null))).await.unwrap();
    assert!(b.get("k").await.unwrap().is_none());
}
