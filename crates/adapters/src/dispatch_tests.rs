// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;
use crate::router::Router;
use bytes::Bytes;
use mf_wire::MultiHeaderMap;
use std::sync::Arc;

struct Echo {
    router: Router<Echo>,
}

impl Plugin for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn get_bindings(&self, _options: &mf_config::WorkerOptionsSet, _worker_index: mf_core::WorkerIndex) -> Vec<mf_config::Binding> {
        Vec::new()
    }

    #[cfg(test)]
    fn reset_for_tests(&self) {}
}

impl RoutedPlugin<Echo> for Echo {
    fn router(&self) -> &Router<Echo> {
        &self.router
    }
}

fn req(path: &str) -> (UniversalRequest, String) {
    (
        UniversalRequest {
            method: Method::GET,
            url: format!("http://localhost{path}"),
            headers: MultiHeaderMap::new(),
            body: Bytes::new(),
        },
        path.to_string(),
    )
}

#[tokio::test]
async fn routed_handle_delegates_to_the_plugin_router() {
    let router = Router::new().route(Method::GET, "/:name", |_ctx, params, _req| async move {
        Ok(UniversalResponse::new(200).with_body(Bytes::from(params["name"].clone())))
    });
    let handle = RoutedHandle::new(Arc::new(Echo { router }));
    assert_eq!(handle.plugin_name(), "echo");

    let (request, path) = req("/world");
    let response = handle.dispatch(&Method::GET, &path, request).await.expect("matched").expect("ok");
    assert_eq!(response.body.as_bytes(), b"world");
}

#[tokio::test]
async fn routed_handle_returns_none_for_unmatched_path() {
    let router: Router<Echo> = Router::new();
    let handle = RoutedHandle::new(Arc::new(Echo { router }));
    let (request, path) = req("/anything");
    assert!(handle.dispatch(&Method::GET, &path, request).await.is_none());
}
