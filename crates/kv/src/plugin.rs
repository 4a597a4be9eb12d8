// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Wires [`KvGateway`] into the plugin framework (spec.md §4.3, §4.5 "KV").
//!
//! Loopback paths are `/kv/:namespace/values/:key` for single-key
//! operations and `/kv/:namespace/keys` (query string `prefix`/`cursor`/
//! `limit`) for listing; the `/kv` prefix itself is stripped by the
//! dispatcher before the router ever sees the path.

use crate::entry::PutRequest;
use crate::error::KvError;
use crate::gateway::KvGateway;
use mf_adapters::{GatewayFactory, HttpError, PathParams, Plugin, RoutedPlugin, Router};
use mf_config::{Binding, WorkerOptionsSet};
use mf_core::{Clock, NamespaceName, WorkerIndex};
use mf_wire::headers::PERSISTENCE;
use mf_wire::{parse_query, ResponseBody, UniversalRequest, UniversalResponse};
use std::sync::Arc;

/// Reserved headers carrying `put` options that have no natural home in a
/// URL path or query string.
pub const EXPIRATION_HEADER: &str = "mf-kv-expiration";
pub const EXPIRATION_TTL_HEADER: &str = "mf-kv-expiration-ttl";
pub const METADATA_HEADER: &str = "mf-kv-metadata";

pub struct KvPlugin<C: Clock> {
    factory: Arc<GatewayFactory<KvGateway<C>>>,
    persist_raw: Option<String>,
    router: Router<KvPlugin<C>>,
}

impl<C: Clock> KvPlugin<C> {
    pub fn new(plugin_root: std::path::PathBuf, clock: C, persist_raw: Option<String>) -> Self {
        let factory = GatewayFactory::new(plugin_root, move |backend| KvGateway::new(backend, clock.clone()));
        Self { factory: Arc::new(factory), persist_raw, router: build_router() }
    }

    /// `MF-Persistence` on the request overrides the plugin's own
    /// construction-time `persist` option for this call (spec.md §6
    /// "reserved headers").
    async fn gateway_for(&self, namespace: &str, req: &UniversalRequest) -> Result<Arc<KvGateway<C>>, KvError> {
        let persist_raw = req.headers.get(PERSISTENCE).or(self.persist_raw.as_deref());
        Ok(self.factory.get(&NamespaceName::from(namespace), persist_raw).await?)
    }
}

fn build_router<C: Clock>() -> Router<KvPlugin<C>> {
    Router::new()
        .route(http::Method::GET, "/:namespace/values/:key", handle_get)
        .route(http::Method::PUT, "/:namespace/values/:key", handle_put)
        .route(http::Method::DELETE, "/:namespace/values/:key", handle_delete)
        .route(http::Method::GET, "/:namespace/keys", handle_list)
}

async fn handle_get<C: Clock>(
    plugin: Arc<KvPlugin<C>>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["namespace"], &req).await?;
    match gateway.get(&params["key"]).await? {
        None => Err(HttpError::not_found("key not found")),
        Some((value, metadata)) => {
            let mut resp = UniversalResponse::new(200);
            if let Some(metadata) = metadata {
                resp = resp.with_header(METADATA_HEADER, metadata.to_string());
            }
            resp.body = ResponseBody::Bytes(value);
            Ok(resp)
        }
    }
}

async fn handle_put<C: Clock>(
    plugin: Arc<KvPlugin<C>>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["namespace"], &req).await?;
    let metadata = req
        .headers
        .get(METADATA_HEADER)
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e: serde_json::Error| HttpError::bad_request(e.to_string()))?;
    let request = PutRequest {
        expiration_secs: parse_header_u64(&req, EXPIRATION_HEADER)?,
        expiration_ttl_secs: parse_header_u64(&req, EXPIRATION_TTL_HEADER)?,
        metadata,
    };
    gateway.put(&params["key"], req.body, request).await?;
    Ok(UniversalResponse::new(204))
}

fn parse_header_u64(req: &UniversalRequest, name: &str) -> Result<Option<u64>, HttpError> {
    req.headers
        .get(name)
        .map(|v| v.parse::<u64>().map_err(|_| HttpError::bad_request(format!("{name} must be a u64"))))
        .transpose()
}

async fn handle_delete<C: Clock>(
    plugin: Arc<KvPlugin<C>>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["namespace"], &req).await?;
    gateway.delete(&params["key"]).await?;
    Ok(UniversalResponse::new(204))
}

async fn handle_list<C: Clock>(
    plugin: Arc<KvPlugin<C>>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["namespace"], &req).await?;
    let query = parse_query(&req.url);
    let limit = query.get("limit").map(|v| v.parse::<usize>()).transpose().map_err(|_| {
        HttpError::bad_request("limit must be a non-negative integer")
    })?;
    let result = gateway
        .list(query.get("prefix").map(String::as_str), query.get("cursor").map(String::as_str), limit)
        .await?;
    let body = serde_json::to_vec(&result).map_err(|e| HttpError::internal(e.to_string()))?;
    Ok(UniversalResponse::new(200)
        .with_header("content-type", "application/json")
        .with_body(body))
}

impl<C: Clock> Plugin for KvPlugin<C> {
    fn name(&self) -> &'static str {
        "kv"
    }

    fn get_bindings(&self, _options: &WorkerOptionsSet, _worker_index: WorkerIndex) -> Vec<Binding> {
        Vec::new()
    }

    #[cfg(test)]
    fn reset_for_tests(&self) {}
}

impl<C: Clock> RoutedPlugin<KvPlugin<C>> for KvPlugin<C> {
    fn router(&self) -> &Router<KvPlugin<C>> {
        &self.router
    }
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
