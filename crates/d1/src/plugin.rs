// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Wires [`D1Gateway`] into the plugin framework (spec.md §4.3, §4.5 "D1").
//!
//! Loopback paths: `/d1/:database/query`, `/d1/:database/execute`,
//! `/d1/:database/batch`, `/d1/:database/dump`.

use crate::entry::{D1Response, Statement};
use crate::factory::D1Factory;
use crate::gateway::D1Gateway;
use mf_adapters::{HttpError, PathParams, Plugin, RoutedPlugin, Router};
use mf_config::{Binding, WorkerOptionsSet};
use mf_core::{NamespaceName, WorkerIndex};
use mf_wire::headers::PERSISTENCE;
use mf_wire::{ResponseBody, UniversalRequest, UniversalResponse};
use std::sync::Arc;

pub struct D1Plugin {
    factory: Arc<D1Factory>,
    persist_raw: Option<String>,
    router: Router<D1Plugin>,
}

impl D1Plugin {
    pub fn new(plugin_root: std::path::PathBuf, persist_raw: Option<String>) -> Self {
        Self { factory: Arc::new(D1Factory::new(plugin_root)), persist_raw, router: build_router() }
    }

    /// `MF-Persistence` on the request overrides the plugin's own
    /// construction-time `persist` option for this call (spec.md §6
    /// "reserved headers").
    async fn gateway_for(&self, database: &str, req: &UniversalRequest) -> Result<Arc<D1Gateway>, HttpError> {
        let persist_raw = req.headers.get(PERSISTENCE).or(self.persist_raw.as_deref());
        self.factory.get(&NamespaceName::from(database), persist_raw).await.map_err(|e| e.into_http_error())
    }
}

fn build_router() -> Router<D1Plugin> {
    Router::new()
        .route(http::Method::POST, "/:database/query", handle_query)
        .route(http::Method::POST, "/:database/execute", handle_execute)
        .route(http::Method::POST, "/:database/batch", handle_batch)
        .route(http::Method::GET, "/:database/dump", handle_dump)
}

fn parse_statement(body: &[u8]) -> Result<Statement, HttpError> {
    serde_json::from_slice(body).map_err(|e| HttpError::bad_request(format!("malformed statement: {e}")))
}

fn json_response(value: &D1Response) -> Result<UniversalResponse, HttpError> {
    let body = serde_json::to_vec(value).map_err(|e| HttpError::internal(e.to_string()))?;
    Ok(UniversalResponse::new(200).with_header("content-type", "application/json").with_body(body))
}

async fn handle_query(
    plugin: Arc<D1Plugin>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["database"], &req).await?;
    let statement = parse_statement(&req.body)?;
    let result = gateway.query(&statement).await.map_err(|e| e.into_http_error())?;
    json_response(&D1Response::single(result))
}

async fn handle_execute(
    plugin: Arc<D1Plugin>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["database"], &req).await?;
    let statement = parse_statement(&req.body)?;
    let result = gateway.execute(&statement).await.map_err(|e| e.into_http_error())?;
    json_response(&D1Response::single(result))
}

async fn handle_batch(
    plugin: Arc<D1Plugin>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["database"], &req).await?;
    let statements: Vec<Statement> = serde_json::from_slice(&req.body)
        .map_err(|e| HttpError::bad_request(format!("malformed batch: {e}")))?;
    let (results, error) = gateway.batch(&statements).await;
    if let Some(error) = error {
        tracing::warn!(error = %error, "d1 batch rolled back");
    }
    json_response(&D1Response::batch(results))
}

async fn handle_dump(
    plugin: Arc<D1Plugin>,
    params: PathParams,
    req: UniversalRequest,
) -> Result<UniversalResponse, HttpError> {
    let gateway = plugin.gateway_for(&params["database"], &req).await?;
    match gateway.dump().await.map_err(|e| e.into_http_error())? {
        Some(bytes) => {
            let mut resp = UniversalResponse::new(200).with_header("content-type", "application/octet-stream");
            resp.body = ResponseBody::Bytes(bytes.into());
            Ok(resp)
        }
        None => Err(HttpError::not_found("namespace has no on-disk database to dump")),
    }
}

impl Plugin for D1Plugin {
    fn name(&self) -> &'static str {
        "d1"
    }

    fn get_bindings(&self, _options: &WorkerOptionsSet, _worker_index: WorkerIndex) -> Vec<Binding> {
        Vec::new()
    }

    #[cfg(test)]
    fn reset_for_tests(&self) {}
}

impl RoutedPlugin<D1Plugin> for D1Plugin {
    fn router(&self) -> &Router<D1Plugin> {
        &self.router
    }
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
