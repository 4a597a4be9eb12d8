// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;
use mf_wire::MultiHeaderMap;

fn headers(pairs: &[(&str, &str)]) -> MultiHeaderMap {
    let mut h = MultiHeaderMap::new();
    for (name, value) in pairs {
        h.insert(name, value.to_string());
    }
    h
}

#[test]
fn no_store_is_never_storable() {
    let h = headers(&[("cache-control", "no-store, max-age=60")]);
    let decision = evaluate(&h, 0);
    assert!(!decision.storable);
}

#[test]
fn set_cookie_without_refinement_is_not_storable() {
    let h = headers(&[("cache-control", "max-age=60"), ("set-cookie", "a=b")]);
    let decision = evaluate(&h, 0);
    assert!(!decision.storable);
}

#[test]
fn set_cookie_with_private_refinement_is_storable_and_stripped() {
    let h = headers(&[("cache-control", "private=set-cookie, max-age=60"), ("set-cookie", "a=b")]);
    let decision = evaluate(&h, 0);
    assert!(decision.storable);
    assert!(decision.strip_set_cookie);
    assert_eq!(decision.ttl_secs, 60);
}

#[test]
fn s_maxage_takes_priority_over_max_age() {
    let h = headers(&[("cache-control", "max-age=10, s-maxage=600")]);
    let decision = evaluate(&h, 0);
    assert_eq!(decision.ttl_secs, 600);
}

#[test]
fn expires_header_is_used_when_no_max_age_directive() {
    let h = headers(&[("expires", "Thu, 01 Jan 1970 00:10:00 GMT")]);
    let decision = evaluate(&h, 0);
    assert_eq!(decision.ttl_secs, 600);
}

#[test]
fn no_freshness_information_is_not_storable() {
    let h = headers(&[("cache-control", "public")]);
    let decision = evaluate(&h, 0);
    assert!(!decision.storable);
    assert_eq!(decision.ttl_secs, 0);
}

#[test]
fn expires_in_the_past_yields_zero_ttl_and_is_not_storable() {
    let h = headers(&[("expires", "Thu, 01 Jan 1970 00:00:00 GMT")]);
    let decision = evaluate(&h, 1_000);
    assert_eq!(decision.ttl_secs, 0);
    assert!(!decision.storable);
}
