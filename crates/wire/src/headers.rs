// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Reserved header names used at the loopback HTTP boundary.
//!
//! These never reach the worker's `fetch` handler as regular headers; the
//! loopback server strips and reinterprets them before and after dispatch.

/// Carries the [`mf_core::PersistenceDescriptor`] a gateway call should use,
/// set by the plugin router when routing a request to a gateway, read by
/// the gateway factory to select (or build) the right backend instance.
pub const PERSISTENCE: &str = "MF-Persistence";

/// Identifies a custom-service binding target as `<workerIndex>/<bindingName>`,
/// used by the loopback server to route a `fetch()` call issued against a
/// service binding to the correct sibling worker instead of through the
/// entry socket.
pub const CUSTOM_SERVICE: &str = "MF-Custom-Service";

/// Carries a base64-encoded `cf` blob (the Cloudflare-specific request
/// metadata object) across the loopback boundary, since `fetch()` has no
/// first-class way to attach out-of-band request metadata.
pub const CF_BLOB: &str = "MF-Cf-Blob";

/// All reserved headers, for hop-by-hop stripping before a request is
/// forwarded to user code.
pub const ALL: &[&str] = &[PERSISTENCE, CUSTOM_SERVICE, CF_BLOB];

#[cfg(test)]
#[path = "headers_tests.rs"]
mod tests;
