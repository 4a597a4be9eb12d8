// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;

fn metadata() -> CacheMetadata {
    CacheMetadata {
        status: 200,
        headers: vec![("content-type".to_string(), "text/plain".to_string())],
        size: 5,
        stored_at_secs: 1_000,
        ttl_secs: 60,
        vary_snapshot: vec![("accept-encoding".to_string(), "gzip".to_string())],
    }
}

#[test]
fn fresh_before_expiry_stale_after() {
    let m = metadata();
    assert!(m.is_fresh(1_059));
    assert!(!m.is_fresh(1_060));
}

#[test]
fn matches_vary_when_request_header_matches_snapshot() {
    let m = metadata();
    let mut req = MultiHeaderMap::new();
    req.insert("accept-encoding", "gzip");
    assert!(m.matches_vary(&req));
}

#[test]
fn does_not_match_vary_when_request_header_differs() {
    let m = metadata();
    let mut req = MultiHeaderMap::new();
    req.insert("accept-encoding", "br");
    assert!(!m.matches_vary(&req));
}

#[test]
fn no_vary_snapshot_always_matches() {
    let mut m = metadata();
    m.vary_snapshot.clear();
    assert!(m.matches_vary(&MultiHeaderMap::new()));
}

#[test]
fn to_header_map_round_trips_stored_headers() {
    let m = metadata();
    let map = m.to_header_map();
    assert_eq!(map.get("content-type"), Some("text/plain"));
}
