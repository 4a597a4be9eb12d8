// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Newtype identifiers, mirroring the convention of giving every distinct
//! numeric/string identity its own type instead of passing bare `usize`s
//! and `String`s around.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monotonically increasing reconfiguration generation.
///
/// Bumped on every accepted `setOptions` call and carried in the readiness
/// probe header so the entry worker can report which generation it has
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OptionsVersion(pub u64);

impl OptionsVersion {
    pub const INITIAL: OptionsVersion = OptionsVersion(0);

    pub fn next(self) -> OptionsVersion {
        OptionsVersion(self.0 + 1)
    }
}

impl fmt::Display for OptionsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a worker within the `workerOptions[]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerIndex(pub usize);

impl fmt::Display for WorkerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a registered plugin (`cache`, `kv`, `r2`, `d1`, `durable_objects`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginName(pub String);

impl fmt::Display for PluginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PluginName {
    fn from(s: &str) -> Self {
        PluginName(s.to_string())
    }
}

/// Caller-supplied namespace string, prior to filesystem sanitization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceName(pub String);

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NamespaceName {
    fn from(s: &str) -> Self {
        NamespaceName(s.to_string())
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
