// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Type-erased loopback dispatch (spec.md §4.2 "`/<pluginName>/<...>` →
//! dispatches to the registered plugin router").
//!
//! The loopback server holds a `Vec<Arc<dyn LoopbackDispatch>>` keyed by
//! plugin name; it neither knows nor cares whether a given plugin is
//! backed by [`Router`]'s `:param` matching (KV, R2, D1) or dispatches
//! some other way (the cache plugin treats the entire remaining path as
//! its key). [`RoutedHandle`] bridges the common case.

use crate::http_error::HttpError;
use crate::plugin::{Plugin, RoutedPlugin};
use async_trait::async_trait;
use http::Method;
use mf_wire::{UniversalRequest, UniversalResponse};
use std::sync::Arc;

/// One plugin's loopback entry point, erased over its concrete gateway and
/// router types.
#[async_trait]
pub trait LoopbackDispatch: Send + Sync {
    fn plugin_name(&self) -> &'static str;

    /// `path` is already stripped of the leading `/<pluginName>` segment.
    /// `None` means "no route matched" (rendered as 404 by the caller);
    /// `Some(Err(_))` is an `HttpError` to render.
    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        req: UniversalRequest,
    ) -> Option<Result<UniversalResponse, HttpError>>;
}

/// Adapts any [`RoutedPlugin`] into a [`LoopbackDispatch`] by delegating to
/// its [`Router`](crate::Router).
pub struct RoutedHandle<P>(pub Arc<P>);

impl<P> RoutedHandle<P> {
    pub fn new(plugin: Arc<P>) -> Self {
        Self(plugin)
    }
}

#[async_trait]
impl<P> LoopbackDispatch for RoutedHandle<P>
where
    P: RoutedPlugin<P> + Plugin + Send + Sync + 'static,
{
    fn plugin_name(&self) -> &'static str {
        self.0.name()
    }

    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        req: UniversalRequest,
    ) -> Option<Result<UniversalResponse, HttpError>> {
        self.0.router().dispatch(Arc::clone(&self.0), method, path, req).await
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
