use super::*;
use crate::entry::Statement;

#[tokio::test]
async fn memory_namespaces_do_not_share_state() {
    let factory = D1Factory::new(PathBuf::from("/tmp"));
    let a = factory.get(&NamespaceName::from("a"), None).await.expect("gateway a");
    let b = factory.get(&NamespaceName::from("b"), None).await.expect("gateway b");

    a.execute(&Statement { sql: "CREATE TABLE t (id INTEGER)".to_string(), params: vec![] })
        .await
        .expect("create in a");
    let err = b
        .query(&Statement { sql: "SELECT * FROM t".to_string(), params: vec![] })
        .await
        .expect_err("table does not exist in b");
    assert!(matches!(err, D1Error::Sql(_)));
}

#[tokio::test]
async fn same_namespace_and_descriptor_returns_the_same_gateway() {
    let factory = D1Factory::new(PathBuf::from("/tmp"));
    let first = factory.get(&NamespaceName::from("a"), None).await.expect("first");
    let second = factory.get(&NamespaceName::from("a"), None).await.expect("second");
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn file_backed_namespace_persists_under_plugin_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    let factory = D1Factory::new(dir.path().to_path_buf());
    let gateway = factory
        .get(&NamespaceName::from("orders"), Some("true"))
        .await
        .expect("file-backed gateway");
    gateway
        .execute(&Statement { sql: "CREATE TABLE t (id INTEGER)".to_string(), params: vec![] })
        .await
        .expect("create table");
    assert!(gateway.dump().await.expect("dump").is_some());
}
