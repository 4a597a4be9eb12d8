use super::*;
use mf_core::FakeClock;
use mf_storage::MemoryBackend;

fn gateway() -> R2Gateway<FakeClock> {
    R2Gateway::new(Arc::new(MemoryBackend::new()), FakeClock::new())
}

async fn put_simple(gateway: &R2Gateway<FakeClock>, key: &str, body: &[u8]) -> ObjectMetadata {
    gateway
        .put(
            key,
            Bytes::copy_from_slice(body),
            HttpMetadata::default(),
            BTreeMap::new(),
            Checksums::default(),
            &PutConditional::default(),
        )
        .await
        .expect("put succeeds")
}

#[tokio::test]
async fn put_then_get_round_trips_bytes_and_etag() {
    let gateway = gateway();
    let meta = put_simple(&gateway, "a", b"hello").await;
    let expected_etag = hex::encode(Md5::digest(b"hello"));
    assert_eq!(meta.etag, expected_etag);

    match gateway.get("a", &GetConditional::default()).await.expect("get") {
        GetOutcome::Found { meta, body } => {
            assert_eq!(body.as_ref(), b"hello");
            assert_eq!(meta.etag, expected_etag);
        }
        _ => panic!("expected Found"),
    }
}

#[tokio::test]
async fn get_missing_key_is_not_found() {
    let gateway = gateway();
    assert!(matches!(
        gateway.get("missing", &GetConditional::default()).await.expect("get"),
        GetOutcome::NotFound
    ));
}

#[tokio::test]
async fn if_match_satisfied_allows_read() {
    let gateway = gateway();
    let meta = put_simple(&gateway, "a", b"hello").await;
    let cond = GetConditional { if_match: Some(format!("\"{}\"", meta.etag)), ..Default::default() };
    assert!(matches!(gateway.get("a", &cond).await.expect("get"), GetOutcome::Found { .. }));
}

#[tokio::test]
async fn if_match_unsatisfied_is_precondition_failed() {
    let gateway = gateway();
    put_simple(&gateway, "a", b"hello").await;
    let cond = GetConditional { if_match: Some("\"wrong\"".to_string()), ..Default::default() };
    assert!(matches!(gateway.get("a", &cond).await.expect("get"), GetOutcome::PreconditionFailed { .. }));
}

#[tokio::test]
async fn if_match_satisfied_skips_unmodified_since_check() {
    let gateway = gateway();
    let meta = put_simple(&gateway, "a", b"hello").await;
    let far_future = httpdate::fmt_http_date(
        std::time::UNIX_EPOCH + std::time::Duration::from_secs(meta.uploaded_at_secs + 10_000),
    );
    // If-Unmodified-Since in the past relative to upload would normally
    // fail, but a satisfied If-Match should bypass the date check.
    let cond = GetConditional {
        if_match: Some(format!("\"{}\"", meta.etag)),
        if_unmodified_since: Some(far_future),
        ..Default::default()
    };
    assert!(matches!(gateway.get("a", &cond).await.expect("get"), GetOutcome::Found { .. }));
}

#[tokio::test]
async fn if_none_match_wildcard_matches_any_existing_object() {
    let gateway = gateway();
    put_simple(&gateway, "a", b"hello").await;
    let cond = GetConditional { if_none_match: Some("*".to_string()), ..Default::default() };
    assert!(matches!(gateway.get("a", &cond).await.expect("get"), GetOutcome::NotModified { .. }));
}

#[tokio::test]
async fn put_rejects_checksum_mismatch() {
    let gateway = gateway();
    let checksums = Checksums { md5: Some("deadbeef".to_string()), ..Default::default() };
    let err = gateway
        .put(
            "a",
            Bytes::from_static(b"hello"),
            HttpMetadata::default(),
            BTreeMap::new(),
            checksums,
            &PutConditional::default(),
        )
        .await
        .expect_err("checksum mismatch rejected");
    assert!(matches!(err, R2Error::ChecksumMismatch { algorithm: "md5" }));
}

#[tokio::test]
async fn put_onlyif_none_match_star_rejects_overwrite() {
    let gateway = gateway();
    put_simple(&gateway, "a", b"first").await;
    let cond = PutConditional { if_none_match: Some("*".to_string()), ..Default::default() };
    let err = gateway
        .put(
            "a",
            Bytes::from_static(b"second"),
            HttpMetadata::default(),
            BTreeMap::new(),
            Checksums::default(),
            &cond,
        )
        .await
        .expect_err("overwrite rejected");
    assert!(matches!(err, R2Error::PreconditionFailed { .. }));
}

#[tokio::test]
async fn delete_is_idempotent_for_missing_keys() {
    let gateway = gateway();
    gateway.delete(&["never-existed".to_string()]).await.expect("delete of missing key is a no-op");
}

#[tokio::test]
async fn list_respects_prefix_cursor_and_start_after() {
    let gateway = gateway();
    for key in ["a/1", "a/2", "a/3", "b/1"] {
        put_simple(&gateway, key, b"x").await;
    }
    let result = gateway
        .list(ListOptions { prefix: Some("a/".to_string()), limit: Some(10), ..Default::default() })
        .await
        .expect("list");
    assert_eq!(result.objects.len(), 3);

    let result = gateway
        .list(ListOptions {
            prefix: Some("a/".to_string()),
            start_after: Some("a/1".to_string()),
            limit: Some(10),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(result.objects.iter().map(|o| o.key.as_str()).collect::<Vec<_>>(), vec!["a/2", "a/3"]);
}

#[tokio::test]
async fn list_with_delimiter_collapses_common_prefixes() {
    let gateway = gateway();
    for key in ["photos/2024/a.jpg", "photos/2024/b.jpg", "photos/2025/c.jpg", "readme.txt"] {
        put_simple(&gateway, key, b"x").await;
    }
    let result = gateway
        .list(ListOptions {
            prefix: Some("photos/".to_string()),
            delimiter: Some("/".to_string()),
            limit: Some(10),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(result.objects.len(), 0);
    assert_eq!(result.delimited_prefixes, vec!["photos/2024/".to_string(), "photos/2025/".to_string()]);
}
