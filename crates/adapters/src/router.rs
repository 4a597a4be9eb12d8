// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Method+path routing for loopback requests (spec.md §4.3 "Router").
//!
//! Path syntax: `/segment/:param` with an optional trailing `/?`. Routes
//! are matched in registration order, first match wins.

use crate::http_error::HttpError;
use http::Method;
use mf_wire::{UniversalRequest, UniversalResponse};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type PathParams = BTreeMap<String, String>;
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<UniversalResponse, HttpError>> + Send>>;
pub type HandlerFn<Ctx> =
    Arc<dyn Fn(Arc<Ctx>, PathParams, UniversalRequest) -> HandlerFuture + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed route path, e.g. `/blobs/:key` or `/status/?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
    trailing_slash_optional: bool,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let (body, trailing_slash_optional) = match pattern.strip_suffix("/?") {
            Some(rest) => (rest, true),
            None => (pattern, false),
        };
        let segments = body
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { segments, trailing_slash_optional }
    }

    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let trimmed = path.trim_start_matches('/');
        let trimmed = if self.trailing_slash_optional {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        let parts: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = PathParams::new();
        for (segment, part) in self.segments.iter().zip(parts.iter()) {
            match segment {
                Segment::Literal(expected) => {
                    if expected != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

struct Route<Ctx> {
    method: Method,
    pattern: PathPattern,
    handler: HandlerFn<Ctx>,
}

/// Method+path router for one plugin's loopback-relative paths (the
/// `/<pluginName>` prefix is stripped by the dispatcher before matching).
pub struct Router<Ctx> {
    routes: Vec<Route<Ctx>>,
}

impl<Ctx> Default for Router<Ctx> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<Ctx: Send + Sync + 'static> Router<Ctx> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route<F, Fut>(mut self, method: Method, pattern: &str, handler: F) -> Self
    where
        F: Fn(Arc<Ctx>, PathParams, UniversalRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<UniversalResponse, HttpError>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            pattern: PathPattern::parse(pattern),
            handler: Arc::new(move |ctx, params, req| Box::pin(handler(ctx, params, req))),
        });
        self
    }

    /// Find and invoke the first matching route. `None` means "no route
    /// matched", which the loopback server renders as a 404; `Some(Err(_))`
    /// is an `HttpError` the router converts into a response.
    pub async fn dispatch(
        &self,
        ctx: Arc<Ctx>,
        method: &Method,
        path: &str,
        req: UniversalRequest,
    ) -> Option<Result<UniversalResponse, HttpError>> {
        for route in &self.routes {
            if &route.method != method {
                continue;
            }
            if let Some(params) = route.pattern.matches(path) {
                return Some((route.handler)(ctx, params, req).await);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
