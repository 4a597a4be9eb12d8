// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;

struct EchoGateway {
    backend: Arc<dyn StorageBackend>,
}

fn factory() -> (GatewayFactory<EchoGateway>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let factory = GatewayFactory::new(dir.path().to_path_buf(), |backend| EchoGateway { backend });
    (factory, dir)
}

#[tokio::test]
async fn repeated_lookups_with_the_same_descriptor_return_the_same_gateway() {
    let (factory, _dir) = factory();
    let ns = NamespaceName::from("widgets");
    let first = factory.get(&ns, None).await.expect("get");
    let second = factory.get(&ns, None).await.expect("get");
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn memory_namespace_identity_survives_gateway_rebuild() {
    let (factory, _dir) = factory();
    let ns = NamespaceName::from("widgets");
    factory.get(&ns, None).await.expect("get");
    let before = factory.memory_backend_identity(&ns).expect("memory backend exists");

    // Switch to disk persistence and back; the gateway wrapper is rebuilt
    // twice, but the in-process memory map for this namespace must not be
    // recreated or lost.
    factory.get(&ns, Some("true")).await.expect("get");
    factory.get(&ns, None).await.expect("get");
    let after = factory.memory_backend_identity(&ns).expect("memory backend exists");
    assert_eq!(before, after);
}

#[tokio::test]
async fn switching_persistence_descriptor_starts_with_an_empty_store() {
    let (factory, _dir) = factory();
    let ns = NamespaceName::from("widgets");

    let memory_gateway = factory.get(&ns, None).await.expect("get");
    memory_gateway
        .backend
        .put("k", mf_storage::StorageEntry::new(b"v".to_vec(), serde_json::Value::Null))
        .await
        .expect("put");

    let disk_gateway = factory.get(&ns, Some("true")).await.expect("get");
    assert_eq!(disk_gateway.backend.get("k").await.expect("get"), None);
}

#[tokio::test]
async fn distinct_namespaces_get_distinct_memory_backends() {
    let (factory, _dir) = factory();
    let a = factory.get(&NamespaceName::from("a"), None).await.expect("get");
    let b = factory.get(&NamespaceName::from("b"), None).await.expect("get");
    a.backend.put("k", mf_storage::StorageEntry::new(b"v".to_vec(), serde_json::Value::Null)).await.expect("put");
    assert_eq!(b.backend.get("k").await.expect("get"), None);
}
