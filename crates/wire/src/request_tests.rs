// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;

#[test]
fn multi_valued_headers_join_with_comma_space() {
    let mut headers = MultiHeaderMap::new();
    headers.insert("accept", "text/html");
    headers.insert("Accept", "application/json");
    assert_eq!(headers.get("accept"), Some("text/html, application/json"));
}

#[test]
fn set_cookie_is_preserved_as_a_list() {
    let mut headers = MultiHeaderMap::new();
    headers.insert("Set-Cookie", "a=1");
    headers.insert("set-cookie", "b=2");
    assert_eq!(headers.set_cookies(), &["a=1".to_string(), "b=2".to_string()]);
}

#[test]
fn sanitize_strips_hop_by_hop_headers() {
    let mut req = UniversalRequest {
        method: Method::GET,
        url: "http://example.com/".to_string(),
        headers: MultiHeaderMap::new(),
        body: Bytes::new(),
    };
    req.headers.insert("Connection", "keep-alive");
    req.headers.insert("Transfer-Encoding", "chunked");
    req.headers.insert("X-Custom", "1");
    req.sanitize_for_dispatch(false);
    assert!(!req.headers.contains_key("connection"));
    assert!(!req.headers.contains_key("transfer-encoding"));
    assert!(req.headers.contains_key("x-custom"));
}

#[test]
fn sanitize_additionally_strips_websocket_negotiation_on_upgrade() {
    let mut req = UniversalRequest {
        method: Method::GET,
        url: "http://example.com/".to_string(),
        headers: MultiHeaderMap::new(),
        body: Bytes::new(),
    };
    req.headers.insert("Sec-WebSocket-Key", "abc");
    req.sanitize_for_dispatch(true);
    assert!(!req.headers.contains_key("sec-websocket-key"));
}

#[test]
fn response_body_empty_by_default() {
    let resp = UniversalResponse::new(200);
    assert!(resp.body.is_empty());
}
