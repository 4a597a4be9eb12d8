// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;
use bytes::Bytes;
use mf_wire::MultiHeaderMap;

struct Ctx;

fn req(path: &str) -> (UniversalRequest, String) {
    (
        UniversalRequest {
            method: Method::GET,
            url: format!("http://localhost{path}"),
            headers: MultiHeaderMap::new(),
            body: Bytes::new(),
        },
        path.to_string(),
    )
}

#[test]
fn parses_literal_and_param_segments() {
    let pattern = PathPattern::parse("/blobs/:key");
    let params = pattern.matches("/blobs/my-file.txt").expect("matches");
    assert_eq!(params.get("key"), Some(&"my-file.txt".to_string()));
}

#[test]
fn rejects_wrong_segment_count() {
    let pattern = PathPattern::parse("/blobs/:key");
    assert!(pattern.matches("/blobs").is_none());
    assert!(pattern.matches("/blobs/a/b").is_none());
}

#[test]
fn optional_trailing_slash_matches_with_or_without() {
    let pattern = PathPattern::parse("/status/?");
    assert!(pattern.matches("/status").is_some());
    assert!(pattern.matches("/status/").is_some());
}

#[tokio::test]
async fn dispatch_invokes_first_matching_route_in_registration_order() {
    let router: Router<Ctx> = Router::new()
        .route(Method::GET, "/a", |_ctx, _params, _req| async {
            Ok(UniversalResponse::new(200).with_body(Bytes::from_static(b"first")))
        })
        .route(Method::GET, "/a", |_ctx, _params, _req| async {
            Ok(UniversalResponse::new(200).with_body(Bytes::from_static(b"second")))
        });

    let (request, path) = req("/a");
    let result = router
        .dispatch(Arc::new(Ctx), &Method::GET, &path, request)
        .await
        .expect("route matched")
        .expect("handler ok");
    assert_eq!(result.body.as_bytes(), b"first");
}

#[tokio::test]
async fn dispatch_returns_none_for_unmatched_path() {
    let router: Router<Ctx> = Router::new().route(Method::GET, "/a", |_ctx, _params, _req| async {
        Ok(UniversalResponse::new(200))
    });
    let (request, path) = req("/b");
    assert!(router.dispatch(Arc::new(Ctx), &Method::GET, &path, request).await.is_none());
}

#[tokio::test]
async fn dispatch_surfaces_http_errors_from_handlers() {
    let router: Router<Ctx> = Router::new()
        .route(Method::DELETE, "/blobs/:key", |_ctx, _params, _req| async {
            Err(HttpError::not_found("no such key"))
        });
    let (request, path) = req("/blobs/missing");
    let result = router
        .dispatch(Arc::new(Ctx), &Method::DELETE, &path, request)
        .await
        .expect("route matched");
    assert!(result.is_err());
}
