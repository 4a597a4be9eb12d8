// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Shared-cache storability and freshness-lifetime computation (spec.md
//! §4.4 "Storability"), grounded in the canonical HTTP cache-semantics
//! rules: `s-maxage` beats `max-age` beats `Expires`, `no-store` always
//! wins, and a `Set-Cookie` response is unstorable unless the response
//! explicitly opts in with `private=set-cookie`.

use crate::directive::CacheControl;
use mf_wire::MultiHeaderMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorabilityDecision {
    pub storable: bool,
    /// Strip `Set-Cookie` before storing (the `private=set-cookie` case).
    pub strip_set_cookie: bool,
    /// Seconds from response time the entry stays fresh. `0` means the
    /// response carried no freshness information and is not cached.
    pub ttl_secs: u64,
}

fn http_date_secs(value: &str) -> Option<u64> {
    let system_time = httpdate::parse_http_date(value).ok()?;
    system_time.duration_since(std::time::UNIX_EPOCH).ok().map(|d| d.as_secs())
}

/// Decide whether a response is storable and, if so, for how long.
///
/// `response_date_secs` is the time (epoch seconds) the response was
/// received, standing in for the `Date` header when the runtime didn't
/// supply one.
pub fn evaluate(headers: &MultiHeaderMap, response_date_secs: u64) -> StorabilityDecision {
    let cc = headers.get("cache-control").map(CacheControl::parse).unwrap_or_default();

    if cc.no_store {
        return StorabilityDecision { storable: false, strip_set_cookie: false, ttl_secs: 0 };
    }

    let has_set_cookie = !headers.set_cookies().is_empty();
    if has_set_cookie && !cc.private_set_cookie {
        return StorabilityDecision { storable: false, strip_set_cookie: false, ttl_secs: 0 };
    }

    let ttl_secs = cc
        .s_maxage
        .or(cc.max_age)
        .or_else(|| {
            let expires = http_date_secs(headers.get("expires")?)?;
            Some(expires.saturating_sub(response_date_secs))
        })
        .unwrap_or(0);

    StorabilityDecision { storable: ttl_secs > 0, strip_set_cookie: has_set_cookie, ttl_secs }
}

#[cfg(test)]
#[path = "freshness_tests.rs"]
mod tests;
