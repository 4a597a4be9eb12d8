// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Filesystem-safety sanitization for namespace and key strings.
//!
//! Namespace names and storage keys are caller-controlled and get composed
//! into paths by the File and legacy-directory-layout backends. Sanitize
//! before composing, never after.

const REPLACEMENT: char = '_';

/// Replace path separators and other filesystem-hostile characters with `_`.
///
/// Collapses leading `.` sequences (`.`, `..`) so the result can never
/// escape the directory it's composed under.
pub fn sanitize_namespace(raw: &str) -> String {
    sanitize_component(raw)
}

/// Same rules as [`sanitize_namespace`], kept as a distinct function since
/// keys and namespaces are validated against different length/charset rules
/// upstream even though the filesystem-safety transform is identical.
pub fn sanitize_key(raw: &str) -> String {
    sanitize_component(raw)
}

fn sanitize_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '/' | '\\' | '\0' => out.push(REPLACEMENT),
            c if c.is_control() => out.push(REPLACEMENT),
            c => out.push(c),
        }
    }
    // Strip leading dots so the result can't resolve to "." or "..".
    let trimmed = out.trim_start_matches('.');
    if trimmed.is_empty() {
        REPLACEMENT.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
