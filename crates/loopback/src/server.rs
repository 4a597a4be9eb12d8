// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The loopback HTTP/1.1 + WebSocket server (spec.md §4.2).

use axum::body::Bytes as AxumBytes;
use axum::extract::{ConnectInfo, Request as AxumRequest, State};
use axum::response::IntoResponse;
use axum::routing::{any, post};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use http::{HeaderMap, Method, StatusCode};
use mf_adapters::LoopbackDispatch;
use mf_wire::headers::{CF_BLOB, CUSTOM_SERVICE};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::error_page::ErrorEnvelope;
use crate::state::LoopbackState;
use crate::translate::{from_universal_response, to_universal_request, CfOverrides};

/// A running loopback server; `addr()` reports the bound ephemeral port so
/// the caller (the CLI entry point) can hand its URL to the supervisor
/// before spawning the runtime child process.
pub struct LoopbackServer {
    addr: SocketAddr,
    join: tokio::task::JoinHandle<()>,
}

impl LoopbackServer {
    /// Bind on `host` with an OS-assigned port and start serving in the
    /// background.
    pub async fn bind(host: &str, state: Arc<LoopbackState>) -> std::io::Result<Self> {
        let listener = TcpListener::bind((host, 0)).await?;
        let addr = listener.local_addr()?;
        let app = router(state);
        let join = tokio::spawn(async move {
            let _ = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await;
        });
        Ok(Self { addr, join })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn abort(&self) {
        self.join.abort();
    }
}

fn router(state: Arc<LoopbackState>) -> Router {
    Router::new()
        .route("/core/error", post(core_error))
        .route("/cdn-cgi/mf/reload", any(crate::reload::upgrade))
        .fallback(dispatch)
        .with_state(state)
}

async fn core_error(State(state): State<Arc<LoopbackState>>, headers: HeaderMap, body: AxumBytes) -> axum::response::Response {
    let envelope: ErrorEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(_) => return (StatusCode::BAD_REQUEST, "invalid error envelope").into_response(),
    };

    let mapped_stack = match envelope.stack.as_deref() {
        Some(stack) => state.source_map.resolve(stack).await,
        None => None,
    };

    let wants_html = crate::error_page::accepts_html(headers.get("accept").and_then(|v| v.to_str().ok()));
    if wants_html {
        let html = crate::error_page::render_html(&envelope, mapped_stack.as_deref());
        ([("content-type", "text/html; charset=utf-8")], html).into_response()
    } else {
        let text = crate::error_page::render_text(&envelope, mapped_stack.as_deref());
        ([("content-type", "text/plain; charset=utf-8")], text).into_response()
    }
}

/// The cache plugin keys entries by the full request URL, mirroring the
/// runtime's Cache API (`cache.put(request)` reads `request.url`), not by
/// pathname the way the KV/R2/D1 routers do.
const CACHE_PLUGIN_NAME: &str = "cache";

/// Decode the `MF-Cf-Blob` header (base64-encoded `cf` JSON envelope) into
/// per-request overrides; a missing or malformed header just falls back to
/// the synthesized defaults (spec.md §6 "reserved headers").
fn cf_overrides_from_headers(headers: &HeaderMap) -> CfOverrides {
    let Some(raw) = headers.get(CF_BLOB).and_then(|v| v.to_str().ok()) else {
        return CfOverrides::default();
    };
    let Ok(decoded) = STANDARD.decode(raw) else {
        return CfOverrides::default();
    };
    match serde_json::from_slice::<serde_json::Value>(&decoded) {
        Ok(value) => CfOverrides::from_cf_json(&value),
        Err(_) => CfOverrides::default(),
    }
}

async fn dispatch(
    State(state): State<Arc<LoopbackState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: AxumRequest,
) -> axum::response::Response {
    let method = req.method().clone();
    let uri_path = req.uri().path().to_string();
    let uri_query = req.uri().query().map(str::to_string);
    let scheme = req.uri().scheme_str().unwrap_or("http").to_string();
    let host = req.headers().get(http::header::HOST).and_then(|v| v.to_str().ok()).unwrap_or("localhost").to_string();
    let custom_service_selector = req.headers().get(CUSTOM_SERVICE).and_then(|v| v.to_str().ok()).map(str::to_string);
    let is_upgrade = req.headers().get(http::header::UPGRADE).is_some();
    let cf_overrides = cf_overrides_from_headers(req.headers());

    let universal = match to_universal_request(req, Some(peer), &scheme, is_upgrade, &cf_overrides).await {
        Ok(universal) => universal,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    if let Some(selector) = custom_service_selector {
        return match state.custom_services().get(&selector) {
            Some(handler) => match handler(universal).await {
                Ok(resp) => from_universal_response(resp),
                Err(err) => http_error_response(&err),
            },
            None => StatusCode::NOT_FOUND.into_response(),
        };
    }

    let Some((plugin_name, rest_path)) = split_plugin_prefix(&uri_path) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(plugin) = state.plugin(plugin_name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let dispatch_path = if plugin_name == CACHE_PLUGIN_NAME {
        match &uri_query {
            Some(query) => format!("{scheme}://{host}{rest_path}?{query}"),
            None => format!("{scheme}://{host}{rest_path}"),
        }
    } else {
        rest_path.to_string()
    };

    match plugin.dispatch(&method, &dispatch_path, universal).await {
        Some(Ok(resp)) => strip_body_for_head(&method, from_universal_response(resp)),
        Some(Err(err)) => http_error_response(&err),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn http_error_response(err: &mf_adapters::HttpError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, err.message.clone()).into_response()
}

fn strip_body_for_head(method: &Method, resp: axum::response::Response) -> axum::response::Response {
    if method == Method::HEAD {
        let (parts, _) = resp.into_parts();
        axum::response::Response::from_parts(parts, axum::body::Body::empty())
    } else {
        resp
    }
}

/// Split `/<pluginName>/<rest>` into its plugin prefix and the remainder of
/// the path (spec.md §4.3 "the dispatcher... strips the leading
/// `/<pluginName>` prefix"). The remainder keeps its leading slash so a
/// plugin's own router still matches `/segment/:param` against it.
fn split_plugin_prefix(path: &str) -> Option<(&str, &str)> {
    let trimmed = path.strip_prefix('/')?;
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.find('/') {
        Some(idx) => Some((&trimmed[..idx], &trimmed[idx..])),
        None => Some((trimmed, "/")),
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
