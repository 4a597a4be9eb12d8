use super::*;
use bytes::Bytes;
use http::Method;
use mf_core::FakeClock;
use mf_wire::MultiHeaderMap;
use std::sync::Arc;

fn plugin() -> (Arc<KvPlugin<FakeClock>>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    (Arc::new(KvPlugin::new(dir.path().to_path_buf(), FakeClock::new(), None)), dir)
}

fn request(url: &str, body: &[u8]) -> UniversalRequest {
    UniversalRequest {
        method: Method::GET,
        url: url.to_string(),
        headers: MultiHeaderMap::new(),
        body: Bytes::copy_from_slice(body),
    }
}

#[tokio::test]
async fn put_then_get_round_trips_through_the_router() {
    let (plugin, _dir) = plugin();
    let put = plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::PUT, "/ns/values/greeting", request("/ns/values/greeting", b"hello"))
        .await
        .expect("route matched")
        .expect("put succeeded");
    assert_eq!(put.status, 204);

    let get = plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::GET, "/ns/values/greeting", request("/ns/values/greeting", b""))
        .await
        .expect("route matched")
        .expect("get succeeded");
    assert_eq!(get.status, 200);
    assert_eq!(get.body.as_bytes(), b"hello");
}

#[tokio::test]
async fn get_of_missing_key_is_404() {
    let (plugin, _dir) = plugin();
    let err = plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::GET, "/ns/values/missing", request("/ns/values/missing", b""))
        .await
        .expect("route matched")
        .expect_err("missing key is an error");
    assert_eq!(err.status, 404);
}

#[tokio::test]
async fn list_respects_prefix_and_limit() {
    let (plugin, _dir) = plugin();
    for key in ["a/1", "a/2", "b/1"] {
        let path = format!("/ns/values/{key}");
        plugin
            .router()
            .dispatch(Arc::clone(&plugin), &Method::PUT, &path, request(&path, b"v"))
            .await
            .expect("route matched")
            .expect("put succeeded");
    }

    let list_req = request("/ns/keys?prefix=a%2F&limit=1", b"");
    let resp = plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::GET, "/ns/keys", list_req)
        .await
        .expect("route matched")
        .expect("list succeeded");
    let parsed: serde_json::Value = serde_json::from_slice(resp.body.as_bytes()).expect("valid json");
    assert_eq!(parsed["keys"].as_array().expect("keys array").len(), 1);
    assert_eq!(parsed["list_complete"], false);
}

#[tokio::test]
async fn distinct_namespaces_do_not_share_keys() {
    let (plugin, _dir) = plugin();
    plugin
        .router()
        .dispatch(
            Arc::clone(&plugin),
            &Method::PUT,
            "/one/values/shared",
            request("/one/values/shared", b"from-one"),
        )
        .await
        .expect("route matched")
        .expect("put succeeded");

    let err = plugin
        .router()
        .dispatch(
            Arc::clone(&plugin),
            &Method::GET,
            "/two/values/shared",
            request("/two/values/shared", b""),
        )
        .await
        .expect("route matched")
        .expect_err("other namespace has no such key");
    assert_eq!(err.status, 404);
}

#[tokio::test]
async fn invalid_expiration_header_is_bad_request() {
    let (plugin, _dir) = plugin();
    let mut req = request("/ns/values/k", b"v");
    req.headers.insert(EXPIRATION_HEADER, "not-a-number");
    let err = plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::PUT, "/ns/values/k", req)
        .await
        .expect("route matched")
        .expect_err("bad header value");
    assert_eq!(err.status, 400);
}
