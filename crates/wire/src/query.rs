// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Query-string parsing shared by the namespaced gateways (KV, R2, D1):
//! their loopback paths carry a `:namespace`/`:key` pattern match plus a
//! query string for list filters (`prefix`, `cursor`, `limit`, ...).

use std::collections::BTreeMap;

/// Parse the query component of `url` (everything after the first `?`) into
/// a name -> value map, last value wins on duplicate names.
pub fn parse_query(url: &str) -> BTreeMap<String, String> {
    let Some((_, query)) = url.split_once('?') else { return BTreeMap::new() };
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
