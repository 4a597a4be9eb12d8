// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Centralized environment variable access for the CLI entry point.

use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";

/// Host the loopback server and the worker-runtime entry socket both bind
/// to. `MF_HOST` overrides the default.
pub fn host() -> String {
    std::env::var("MF_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string())
}

/// Explicit entry port, or `None` to let the applier pick an ephemeral one.
pub fn entry_port() -> Option<u16> {
    std::env::var("MF_ENTRY_PORT").ok().and_then(|s| s.parse().ok())
}

/// Path to the JSON configuration document describing shared options and
/// worker option sets (spec.md §3). Required; there is no interactive
/// configuration surface in this thin entry point.
pub fn config_path() -> Result<PathBuf, std::env::VarError> {
    std::env::var("MF_CONFIG").map(PathBuf::from)
}

/// Directory persistent on-disk storage (non-memory `persist` options)
/// resolves relative paths against. Defaults to the current directory.
pub fn state_dir() -> PathBuf {
    std::env::var("MF_STATE_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."))
}

/// Path to the worker-runtime binary the supervisor spawns as a child
/// process. Required; this CLI only supervises, it does not embed a
/// runtime.
pub fn runtime_program() -> Result<PathBuf, std::env::VarError> {
    std::env::var("MF_RUNTIME_PROGRAM").map(PathBuf::from)
}
