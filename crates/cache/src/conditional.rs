// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! `If-None-Match` / `If-Modified-Since` evaluation (spec.md §4.4 match
//! semantics, steps 1-2).

/// Strip a leading weak-validator marker for comparison purposes.
fn strip_weak(tag: &str) -> &str {
    tag.trim().strip_prefix("W/").unwrap_or(tag.trim())
}

/// Does `if_none_match` (a comma-separated ETag list, possibly `*`) match
/// the stored `etag`? Comparison is weak: the `W/` prefix is ignored on
/// both sides.
pub fn if_none_match_matches(if_none_match: &str, etag: Option<&str>) -> bool {
    if if_none_match.trim() == "*" {
        return etag.is_some();
    }
    let Some(etag) = etag else { return false };
    let stored = strip_weak(etag);
    if_none_match.split(',').any(|candidate| strip_weak(candidate) == stored)
}

/// Is the stored `Last-Modified` at or before `if_modified_since`? Both are
/// RFC 7231 HTTP-dates; an unparseable date makes this not-modified check
/// fail open (treated as modified, i.e. not a 304).
pub fn is_not_modified_since(last_modified: &str, if_modified_since: &str) -> bool {
    let (Ok(last_modified), Ok(since)) = (
        httpdate::parse_http_date(last_modified),
        httpdate::parse_http_date(if_modified_since),
    ) else {
        return false;
    };
    last_modified <= since
}

#[cfg(test)]
#[path = "conditional_tests.rs"]
mod tests;
