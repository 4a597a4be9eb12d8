// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Size and pagination limits the R2 gateway enforces (spec.md §4.5 "R2").

/// Single-part emulation ceiling: a real R2 bucket accepts multipart
/// uploads well past this, but the loopback path only ever sees one `put`
/// body at a time.
pub const MAX_OBJECT_BYTES: u64 = 5 * 1024 * 1024 * 1024;
pub const MAX_LIST_LIMIT: usize = 1000;
pub const DEFAULT_LIST_LIMIT: usize = 1000;
pub const MAX_DELETE_BATCH: usize = 1000;
