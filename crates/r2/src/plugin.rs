// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Wires [`R2Gateway`] into the plugin framework (spec.md §4.3, §4.5 "R2").
//!
//! Loopback paths: `/r2/:bucket/objects/:key` for single-object operations,
//! `/r2/:bucket/objects` for listing and batch delete.

use crate::entry::{GetConditional, ListOptions, PutEnvelope};
use crate::error::R2Error;
use crate::gateway::{GetOutcome, R2Gateway};
use mf_adapters::{GatewayFactory, HttpError, PathParams, Plugin, RoutedPlugin, Router};
use mf_config::{Binding, WorkerOptionsSet};
use mf_core::{Clock, NamespaceName, WorkerIndex};
use mf_wire::headers::PERSISTENCE;
use mf_wire::{parse_query, ResponseBody, UniversalRequest, UniversalResponse};
use std::sync::Arc;

/// Splits a `put` request body into its metadata-JSON prefix and the raw
/// object bytes that follow (spec.md §6 "Wire format for R2 PUT").
pub const METADATA_SIZE_HEADER: &str = "cf-r2-metadata-size";

pub struct R2Plugin<C: Clock> {
    factory: Arc<GatewayFactory<R2Gateway<C>>>,
    persist_raw: Option<String>,
    router: Router<R2Plugin<C>>,
}

impl<C: Clock> R2Plugin<C> {
    pub fn new(plugin_root: std::path::PathBuf, clock: C, persist_raw: Option<String>) -> Self {
        let factory = GatewayFactory::new(plugin_root, move |backend| R2Gateway::new(backend, clock.clone()));
        Self { factory: Arc::new(factory), persist_raw, router: build_router() }
    }

    /// `MF-Persistence` on the request overrides the plugin's own
    /// construction-time `persist` option for this call (spec.md §6
    /// "reserved headers").
    async fn gateway_for(&self, bucket: &str, req: &UniversalRequest) -> Result<Arc<R2Gateway<C>>, R2Error> {
        let persist_raw = req.headers.get(PERSISTENCE).or(self.persist_raw.as_deref());
        Ok(self.factory.get(&NamespaceName::from(bucket), persist_raw).await?)
    }
}

fn build_router<C: Clock>() -> Router<R2Plugin<C>> {
    Router::new()
        .route(http::Method::HEAD, "/:bucket/objects/:key", handle_head)
        .route(http::Method::GET, "/:bucket/objects/:key", handle_get)
        .route(http::Method::PUT, "/:bucket/objects/:key", handle_put)
        .route(http::Method::DELETE, "/:bucket/objects/:key", handle_delete_one)
        .route(http::Method::DELETE, "/:bucket/objects", handle_delete_batch)
        .route(http::Method::GET, "/:bucket/objects", handle_list)
}

fn get_conditional(req: &UniversalRequest) -> GetConditional {
    GetConditional {
        if_match: req.headers.get("if-match").map(str::to_string),
        if_none_match: req.headers.get("if-none-match").map(str::to_string),
        if_modified_since: req.headers.get("if-modified-since").map(str::to_string),
        if_unmodified_since: req.headers.get("if-unmodified-since").map(str::to_string),
    }
}

async fn handle_head<C: Clock>(
    plugin: Arc<R2Plugin<C>>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["bucket"], &req).await.map_err(|e| e.into_http_error())?;
    match gateway.head(&params["key"]).await.map_err(|e| e.into_http_error())? {
        Some(meta) => {
            let json = serde_json::to_vec(&meta).map_err(|e| HttpError::internal(e.to_string()))?;
            Ok(UniversalResponse::new(200).with_header("content-type", "application/json").with_body(json))
        }
        None => Ok(R2Error::NotFound.into_response()),
    }
}

async fn handle_get<C: Clock>(
    plugin: Arc<R2Plugin<C>>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["bucket"], &req).await.map_err(|e| e.into_http_error())?;
    let outcome = gateway
        .get(&params["key"], &get_conditional(&req))
        .await
        .map_err(|e| e.into_http_error())?;
    Ok(match outcome {
        GetOutcome::Found { meta, body } => {
            let mut resp = UniversalResponse::new(200)
                .with_header("etag", format!("\"{}\"", meta.etag))
                .with_header("cf-r2-metadata", serde_json::to_string(&meta).unwrap_or_default());
            resp.body = ResponseBody::Bytes(body);
            resp
        }
        GetOutcome::NotModified { meta } => {
            UniversalResponse::new(304).with_header("etag", format!("\"{}\"", meta.etag))
        }
        GetOutcome::PreconditionFailed { meta } => {
            R2Error::PreconditionFailed { existing: Some(Box::new(meta)) }.into_response()
        }
        GetOutcome::NotFound => R2Error::NotFound.into_response(),
    })
}

async fn handle_put<C: Clock>(
    plugin: Arc<R2Plugin<C>>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["bucket"], &req).await.map_err(|e| e.into_http_error())?;
    let split = req
        .headers
        .get(METADATA_SIZE_HEADER)
        .ok_or_else(|| HttpError::bad_request(format!("missing {METADATA_SIZE_HEADER} header")))?
        .parse::<usize>()
        .map_err(|_| HttpError::bad_request(format!("{METADATA_SIZE_HEADER} must be an integer")))?;
    if split > req.body.len() {
        return Err(HttpError::bad_request(format!("{METADATA_SIZE_HEADER} exceeds body length")));
    }
    let envelope: PutEnvelope = serde_json::from_slice(&req.body[..split])
        .map_err(|e| HttpError::bad_request(format!("malformed put envelope: {e}")))?;
    let object_bytes = req.body.slice(split..);

    match gateway
        .put(
            &params["key"],
            object_bytes,
            envelope.http_metadata,
            envelope.custom_metadata,
            envelope.checksums,
            &envelope.only_if,
        )
        .await
    {
        Ok(meta) => {
            let json = serde_json::to_vec(&meta).map_err(|e| HttpError::internal(e.to_string()))?;
            Ok(UniversalResponse::new(200).with_header("content-type", "application/json").with_body(json))
        }
        Err(err) => Ok(err.into_response()),
    }
}

async fn handle_delete_one<C: Clock>(
    plugin: Arc<R2Plugin<C>>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["bucket"], &req).await.map_err(|e| e.into_http_error())?;
    gateway.delete(std::slice::from_ref(&params["key"])).await.map_err(|e| e.into_http_error())?;
    Ok(UniversalResponse::new(204))
}

async fn handle_delete_batch<C: Clock>(
    plugin: Arc<R2Plugin<C>>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["bucket"], &req).await.map_err(|e| e.into_http_error())?;
    let keys: Vec<String> =
        serde_json::from_slice(&req.body).map_err(|e| HttpError::bad_request(format!("malformed key list: {e}")))?;
    if keys.len() > crate::limits::MAX_DELETE_BATCH {
        return Ok(R2Error::BatchTooLarge { max: crate::limits::MAX_DELETE_BATCH }.into_response());
    }
    gateway.delete(&keys).await.map_err(|e| e.into_http_error())?;
    Ok(UniversalResponse::new(204))
}

async fn handle_list<C: Clock>(
    plugin: Arc<R2Plugin<C>>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["bucket"], &req).await.map_err(|e| e.into_http_error())?;
    let query = parse_query(&req.url);
    let limit = query
        .get("limit")
        .map(|v| v.parse::<usize>())
        .transpose()
        .map_err(|_| HttpError::bad_request("limit must be a non-negative integer"))?;
    let include: Vec<&str> = query.get("include").map(|v| v.split(',').collect()).unwrap_or_default();
    let opts = ListOptions {
        prefix: query.get("prefix").cloned(),
        cursor: query.get("cursor").cloned(),
        delimiter: query.get("delimiter").cloned(),
        limit,
        start_after: query.get("startAfter").cloned(),
        include_http_metadata: include.contains(&"httpMetadata"),
        include_custom_metadata: include.contains(&"customMetadata"),
    };
    let result = gateway.list(opts).await.map_err(|e| e.into_http_error())?;
    let body = serde_json::to_vec(&result).map_err(|e| HttpError::internal(e.to_string()))?;
    Ok(UniversalResponse::new(200).with_header("content-type", "application/json").with_body(body))
}

impl<C: Clock> Plugin for R2Plugin<C> {
    fn name(&self) -> &'static str {
        "r2"
    }

    fn get_bindings(&self, _options: &WorkerOptionsSet, _worker_index: WorkerIndex) -> Vec<Binding> {
        Vec::new()
    }

    #[cfg(test)]
    fn reset_for_tests(&self) {}
}

impl<C: Clock> RoutedPlugin<R2Plugin<C>> for R2Plugin<C> {
    fn router(&self) -> &Router<R2Plugin<C>> {
        &self.router
    }
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
