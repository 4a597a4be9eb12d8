// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Parsed view over a response's `Cache-Control` header (spec.md §3 "HTTP
//! cache-control directives"). Request-side `Cache-Control` is never parsed
//! by this module: spec.md §4.4 says it's ignored outright (edge policy).

/// The subset of `Cache-Control` directives the freshness evaluator and
/// storability check care about. Unrecognized directives are ignored
/// rather than rejected, matching real cache-control parsers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    pub no_store: bool,
    pub no_cache: bool,
    pub private: bool,
    /// `private=set-cookie`: the response is storable with `Set-Cookie`
    /// stripped, rather than rejected outright.
    pub private_set_cookie: bool,
    pub public: bool,
    pub must_revalidate: bool,
    pub max_age: Option<u64>,
    pub s_maxage: Option<u64>,
    pub stale_while_revalidate: Option<u64>,
}

impl CacheControl {
    pub fn parse(header: &str) -> Self {
        let mut out = CacheControl::default();
        for token in header.split(',') {
            let token = token.trim();
            let (name, value) = match token.split_once('=') {
                Some((n, v)) => (n.trim(), Some(v.trim().trim_matches('"'))),
                None => (token, None),
            };
            match name.to_ascii_lowercase().as_str() {
                "no-store" => out.no_store = true,
                "no-cache" => out.no_cache = true,
                "public" => out.public = true,
                "must-revalidate" => out.must_revalidate = true,
                "private" => match value {
                    Some(v) if v.eq_ignore_ascii_case("set-cookie") => out.private_set_cookie = true,
                    _ => out.private = true,
                },
                "max-age" => out.max_age = value.and_then(|v| v.parse().ok()),
                "s-maxage" => out.s_maxage = value.and_then(|v| v.parse().ok()),
                "stale-while-revalidate" => {
                    out.stale_while_revalidate = value.and_then(|v| v.parse().ok())
                }
                _ => {}
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "directive_tests.rs"]
mod tests;
