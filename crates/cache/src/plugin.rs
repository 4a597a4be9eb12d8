// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Wires [`CacheGateway`] into the plugin framework (spec.md §4.3, §4.4).
//!
//! Unlike the namespaced gateways (KV/R2/D1), a cache request's path *is*
//! the cache key (the normalized request URL the runtime is asking to
//! match/store/purge), so the cache plugin dispatches directly on method
//! rather than through [`mf_adapters::Router`]'s `:param` matching.

use crate::gateway::CacheGateway;
use async_trait::async_trait;
use mf_adapters::{FactoryError, GatewayFactory, HttpError, LoopbackDispatch, Plugin};
use mf_config::{Binding, WorkerOptionsSet};
use mf_core::{Clock, NamespaceName, WorkerIndex};
use mf_wire::headers::PERSISTENCE;
use mf_wire::UniversalRequest;
use std::sync::Arc;

/// Header carrying which named cache (`caches.open(name)`) a request
/// targets; absent means the default cache.
pub const CACHE_NAMESPACE_HEADER: &str = "mf-cache-namespace";
const DEFAULT_CACHE_NAMESPACE: &str = "default";

pub struct CachePlugin<C: Clock> {
    factory: Arc<GatewayFactory<CacheGateway<C>>>,
    persist_raw: Option<String>,
}

impl<C: Clock> CachePlugin<C> {
    pub fn new(plugin_root: std::path::PathBuf, clock: C, persist_raw: Option<String>) -> Self {
        let factory = GatewayFactory::new(plugin_root, move |backend| CacheGateway::new(backend, clock.clone()));
        Self { factory: Arc::new(factory), persist_raw }
    }

    /// `MF-Persistence` on the request overrides the plugin's own
    /// construction-time `persist` option for this call (spec.md §6
    /// "reserved headers").
    async fn gateway_for(&self, req: &UniversalRequest) -> Result<Arc<CacheGateway<C>>, FactoryError> {
        let namespace = req.headers.get(CACHE_NAMESPACE_HEADER).unwrap_or(DEFAULT_CACHE_NAMESPACE);
        let persist_raw = req.headers.get(PERSISTENCE).or(self.persist_raw.as_deref());
        self.factory.get(&NamespaceName::from(namespace), persist_raw).await
    }

    /// Handle a loopback request already stripped of the `/cache` prefix.
    /// `req.url` is the cache key.
    pub async fn handle(&self, req: UniversalRequest) -> Result<mf_wire::UniversalResponse, HttpError> {
        let method = req.method.clone();
        let key = req.url.clone();
        let request_headers = req.headers.clone();
        let gateway = self.gateway_for(&req).await.map_err(|e| HttpError::internal(e.to_string()))?;

        match method {
            http::Method::PUT => Ok(gateway
                .put(&key, req.body, &request_headers)
                .await
                .map_err(HttpError::from)?
                .into_response()),
            http::Method::DELETE => {
                let existed = gateway.purge(&key).await.map_err(HttpError::from)?;
                if existed {
                    Ok(mf_wire::UniversalResponse::new(200))
                } else {
                    Err(HttpError::not_found("no cache entry at this key"))
                }
            }
            http::Method::GET | http::Method::HEAD => {
                gateway.get(&key, &method, &request_headers).await.map_err(HttpError::from)
            }
            other => Err(HttpError::bad_request(format!("unsupported cache method {other}"))),
        }
    }
}

impl<C: Clock> Plugin for CachePlugin<C> {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn get_bindings(&self, _options: &WorkerOptionsSet, _worker_index: WorkerIndex) -> Vec<Binding> {
        Vec::new()
    }

    #[cfg(test)]
    fn reset_for_tests(&self) {}
}

/// Unlike the namespaced gateways, the cache plugin isn't path-routed: the
/// entire remaining path *is* the cache key, so it implements
/// [`LoopbackDispatch`] directly instead of going through [`mf_adapters::Router`].
#[async_trait]
impl<C: Clock> LoopbackDispatch for CachePlugin<C> {
    fn plugin_name(&self) -> &'static str {
        "cache"
    }

    async fn dispatch(
        &self,
        method: &http::Method,
        path: &str,
        mut req: UniversalRequest,
    ) -> Option<Result<mf_wire::UniversalResponse, HttpError>> {
        req.method = method.clone();
        req.url = path.to_string();
        Some(self.handle(req).await)
    }
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
