// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The universal request/response values the loopback server translates
//! node-style HTTP into and out of (spec.md §4.2 "Request translation" /
//! "Response translation").

use bytes::Bytes;
use http::Method;
use std::collections::BTreeMap;

/// Header values joined by `, ` except `Set-Cookie`, which is kept as a
/// list so multiple cookies never collapse into one invalid header line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiHeaderMap {
    single: BTreeMap<String, String>,
    set_cookie: Vec<String>,
}

impl MultiHeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        if name.eq_ignore_ascii_case("set-cookie") {
            self.set_cookie.push(value.into());
            return;
        }
        let key = name.to_ascii_lowercase();
        let value = value.into();
        self.single
            .entry(key)
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case("set-cookie") {
            return self.set_cookie.first().map(|s| s.as_str());
        }
        self.single.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }

    pub fn set_cookies(&self) -> &[String] {
        &self.set_cookie
    }

    pub fn remove(&mut self, name: &str) {
        if name.eq_ignore_ascii_case("set-cookie") {
            self.set_cookie.clear();
        } else {
            self.single.remove(&name.to_ascii_lowercase());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.single
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(self.set_cookie.iter().map(|v| ("set-cookie", v.as_str())))
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some() || (name.eq_ignore_ascii_case("set-cookie") && !self.set_cookie.is_empty())
    }
}

/// Headers stripped before forwarding a request to user code (spec.md §4.2).
pub const HOP_BY_HOP: &[&str] = &["transfer-encoding", "connection", "keep-alive", "expect"];

/// Headers stripped specifically on WebSocket-upgrade requests.
pub const WEBSOCKET_NEGOTIATION: &[&str] = &[
    "sec-websocket-key",
    "sec-websocket-version",
    "sec-websocket-extensions",
    "sec-websocket-protocol",
    "upgrade",
];

#[derive(Debug, Clone)]
pub struct UniversalRequest {
    pub method: Method,
    pub url: String,
    pub headers: MultiHeaderMap,
    pub body: Bytes,
}

impl UniversalRequest {
    /// Strip hop-by-hop headers, and additionally the WebSocket-negotiation
    /// set if this is an upgrade request, before handing the request to
    /// user code.
    pub fn sanitize_for_dispatch(&mut self, is_upgrade: bool) {
        for name in HOP_BY_HOP {
            self.headers.remove(name);
        }
        if is_upgrade {
            for name in WEBSOCKET_NEGOTIATION {
                self.headers.remove(name);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum ResponseBody {
    Bytes(Bytes),
    Empty,
}

impl ResponseBody {
    pub fn len(&self) -> usize {
        match self {
            ResponseBody::Bytes(b) => b.len(),
            ResponseBody::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ResponseBody::Bytes(b) => b,
            ResponseBody::Empty => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct UniversalResponse {
    pub status: u16,
    pub headers: MultiHeaderMap,
    pub body: ResponseBody,
}

impl UniversalResponse {
    pub fn new(status: u16) -> Self {
        Self { status, headers: MultiHeaderMap::new(), body: ResponseBody::Empty }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = ResponseBody::Bytes(body.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
