// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The request/response shapes for D1's `query`/`execute`/`batch`/`dump`
//! operations (spec.md §4.5 "D1").

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One SQL statement plus its positional bind parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct Statement {
    pub sql: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryMeta {
    pub duration: f64,
    pub changes: u64,
    pub last_row_id: i64,
    pub rows_read: u64,
    pub rows_written: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementResult {
    pub results: Vec<Map<String, Value>>,
    pub success: bool,
    pub meta: QueryMeta,
}

/// The full response envelope, including the deprecated top-level mirror
/// of the first result's `meta` fields that legacy callers read directly
/// (spec.md §4.5 "deprecated legacy shape").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct D1Response {
    pub success: bool,
    pub results: Vec<StatementResult>,
    pub duration: f64,
    pub changes: u64,
    pub last_row_id: i64,
}

impl D1Response {
    pub fn single(result: StatementResult) -> Self {
        Self {
            success: result.success,
            duration: result.meta.duration,
            changes: result.meta.changes,
            last_row_id: result.meta.last_row_id,
            results: vec![result],
        }
    }

    pub fn batch(results: Vec<StatementResult>) -> Self {
        let success = results.iter().all(|r| r.success);
        let last = results.last();
        Self {
            duration: last.map(|r| r.meta.duration).unwrap_or_default(),
            changes: last.map(|r| r.meta.changes).unwrap_or_default(),
            last_row_id: last.map(|r| r.meta.last_row_id).unwrap_or_default(),
            results,
            success,
        }
    }
}
