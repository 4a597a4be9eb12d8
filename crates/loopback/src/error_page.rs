// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! `/core/error` (spec.md §4.2, §7 "User-visible failure behavior"): the
//! worker runtime posts a JSON error envelope here when a user's worker
//! throws uncaught; the loopback server rebuilds a native error kind from
//! a closed allow-list, source-maps the stack, and renders an HTML (or
//! plain-text) error page.

use async_trait::async_trait;
use serde::Deserialize;

/// Closed allow-list of error subclasses the envelope's `name` may select
/// (spec.md §4.2); anything else falls back to a generic `Error` base,
/// matched case-sensitively per the expanded spec.
const ALLOWED_SUBCLASSES: &[&str] =
    &["EvalError", "RangeError", "ReferenceError", "SyntaxError", "TypeError", "URIError"];

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub name: Option<String>,
    pub message: Option<String>,
    pub stack: Option<String>,
    pub cause: Option<Box<ErrorEnvelope>>,
}

impl ErrorEnvelope {
    /// The allow-listed subclass name, or the generic `Error` base if
    /// `name` is absent or not in [`ALLOWED_SUBCLASSES`].
    pub fn resolved_name(&self) -> &str {
        match &self.name {
            Some(name) if ALLOWED_SUBCLASSES.contains(&name.as_str()) => name,
            _ => "Error",
        }
    }

    pub fn resolved_message(&self) -> &str {
        self.message.as_deref().unwrap_or("(no message)")
    }
}

/// Resolves a source-mapped rendering of a raw stack trace. Source-map
/// *rendering* is out of scope (spec.md §1); this interface exists so a
/// caller can supply a real resolver.
#[async_trait]
pub trait SourceMapResolver: Send + Sync {
    async fn resolve(&self, raw_stack: &str) -> Option<String>;
}

pub struct NoopSourceMapResolver;

#[async_trait]
impl SourceMapResolver for NoopSourceMapResolver {
    async fn resolve(&self, _raw_stack: &str) -> Option<String> {
        None
    }
}

/// Render the HTML error page body.
pub fn render_html(envelope: &ErrorEnvelope, mapped_stack: Option<&str>) -> String {
    let stack = mapped_stack.or(envelope.stack.as_deref()).unwrap_or("");
    format!(
        "<!DOCTYPE html>\n<html><head><title>{name}</title></head><body>\n\
         <h1>{name}: {message}</h1>\n<pre>{stack}</pre>\n</body></html>\n",
        name = html_escape(envelope.resolved_name()),
        message = html_escape(envelope.resolved_message()),
        stack = html_escape(stack),
    )
}

/// Render the plain-text fallback for callers whose `Accept` header does
/// not include `text/html`.
pub fn render_text(envelope: &ErrorEnvelope, mapped_stack: Option<&str>) -> String {
    let stack = mapped_stack.or(envelope.stack.as_deref()).unwrap_or("");
    format!("{}: {}\n{}\n", envelope.resolved_name(), envelope.resolved_message(), stack)
}

/// Whether an `Accept` header value prefers HTML.
pub fn accepts_html(accept: Option<&str>) -> bool {
    match accept {
        Some(value) => value.split(',').any(|part| part.trim().starts_with("text/html") || part.trim() == "*/*"),
        None => false,
    }
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
#[path = "error_page_tests.rs"]
mod tests;
