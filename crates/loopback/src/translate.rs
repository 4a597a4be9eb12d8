// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Request/response translation at the loopback boundary (spec.md §4.2
//! "Request translation" / "Response translation").

use axum::body::Body;
use axum::extract::Request as AxumRequest;
use bytes::Bytes;
use http::HeaderMap;
use mf_wire::{MultiHeaderMap, ResponseBody, UniversalRequest, UniversalResponse};
use std::net::SocketAddr;

/// Upper bound on a loopback request body; generous enough for any
/// realistic dev-harness payload without letting a runaway client hold the
/// server open indefinitely reading an unbounded stream.
const MAX_BODY_BYTES: usize = 256 * 1024 * 1024;

const DEFAULT_IP_COUNTRY: &str = "XX";

/// Per-request metadata synthesized into `cf-*` headers, overridable by
/// the decoded `cf` envelope carried in the `MF-Cf-Blob` loopback header.
#[derive(Debug, Clone, Default)]
pub struct CfOverrides {
    pub connecting_ip: Option<String>,
    pub ip_country: Option<String>,
    pub ray: Option<String>,
    pub visitor_scheme: Option<String>,
}

impl CfOverrides {
    /// Parse overrides out of a decoded `cf` JSON envelope. Unknown keys
    /// are ignored; this only recognizes the handful of fields the
    /// synthesized `cf-*` headers draw from.
    pub fn from_cf_json(value: &serde_json::Value) -> Self {
        Self {
            connecting_ip: value.get("clientIp").and_then(|v| v.as_str()).map(str::to_string),
            ip_country: value.get("country").and_then(|v| v.as_str()).map(str::to_string),
            ray: value.get("ray").and_then(|v| v.as_str()).map(str::to_string),
            visitor_scheme: value.get("httpProtocol").and_then(|v| v.as_str()).map(str::to_string),
        }
    }
}

fn multi_header_map(headers: &HeaderMap) -> MultiHeaderMap {
    let mut out = MultiHeaderMap::new();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            out.insert(name.as_str(), value);
        }
    }
    out
}

/// Convert an inbound axum request into a [`UniversalRequest`], stripping
/// hop-by-hop (and, for upgrades, WebSocket-negotiation) headers and
/// synthesizing the `cf-*` header set (spec.md §4.2).
pub async fn to_universal_request(
    req: AxumRequest,
    peer: Option<SocketAddr>,
    scheme: &str,
    is_upgrade: bool,
    overrides: &CfOverrides,
) -> Result<UniversalRequest, axum::Error> {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES).await?;

    let mut headers = multi_header_map(&parts.headers);
    synthesize_cf_headers(&mut headers, peer, scheme, overrides);

    let mut universal = UniversalRequest {
        method: parts.method,
        url: parts.uri.to_string(),
        headers,
        body: bytes,
    };
    universal.sanitize_for_dispatch(is_upgrade);
    Ok(universal)
}

fn synthesize_cf_headers(headers: &mut MultiHeaderMap, peer: Option<SocketAddr>, scheme: &str, overrides: &CfOverrides) {
    let ip = overrides
        .connecting_ip
        .clone()
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "127.0.0.1".to_string());

    headers.insert("x-forwarded-proto", overrides.visitor_scheme.clone().unwrap_or_else(|| scheme.to_string()));
    headers.insert("x-real-ip", ip.clone());
    headers.insert("cf-connecting-ip", ip);
    headers.insert("cf-ipcountry", overrides.ip_country.clone().unwrap_or_else(|| DEFAULT_IP_COUNTRY.to_string()));
    headers.insert("cf-ray", overrides.ray.clone().unwrap_or_else(|| "0000000000000000-DEV".to_string()));
    headers.insert(
        "cf-visitor",
        serde_json::json!({ "scheme": overrides.visitor_scheme.clone().unwrap_or_else(|| scheme.to_string()) }).to_string(),
    );
}

/// Convert a [`UniversalResponse`] into an axum response, applying
/// compression (spec.md §4.2 "Response translation") before it leaves this
/// module. `req_method` matters only for `HEAD` (never emitted here; the
/// caller strips bodies for `HEAD` before rendering).
pub fn from_universal_response(resp: UniversalResponse) -> axum::response::Response {
    let UniversalResponse { status, headers, body } = resp;
    let body_bytes: Bytes = match body {
        ResponseBody::Bytes(b) => b,
        ResponseBody::Empty => Bytes::new(),
    };
    let outcome = crate::compression::apply(&headers, body_bytes);

    let mut builder = http::Response::builder().status(status);
    for (name, value) in headers.iter() {
        if name.eq_ignore_ascii_case("content-encoding") || name.eq_ignore_ascii_case(crate::compression::MANUAL_ENCODING_HEADER) {
            continue;
        }
        builder = builder.header(name, value);
    }
    if let Some(encoding) = &outcome.content_encoding {
        builder = builder.header("content-encoding", encoding.as_str());
    }
    if outcome.recompressed {
        // Compression changed the byte length; a stale Content-Length
        // header would be wrong, so this streams the body with no declared
        // length rather than rewriting the header by hand.
        let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(outcome.body) });
        return finish_response(builder.body(Body::from_stream(stream)));
    }
    finish_response(builder.body(Body::from(outcome.body)))
}

/// Falls back to a bare 500 on a malformed header; the headers here all
/// come from our own [`MultiHeaderMap`], so this path is unreachable
/// outside a future bug in header construction.
fn finish_response(built: Result<axum::response::Response, http::Error>) -> axum::response::Response {
    built.unwrap_or_else(|_| {
        let mut resp = axum::response::Response::new(Body::empty());
        *resp.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
        resp
    })
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod tests;
