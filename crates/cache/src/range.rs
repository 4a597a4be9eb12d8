// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! `Range` header parsing (spec.md §4.4.1).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeParse {
    /// No `Range` header, or an empty range list: serve the entire body.
    Full,
    Ranges(Vec<ByteRange>),
    Unsatisfiable,
}

/// Parse a `Range` header against a known body `length`.
///
/// The unit prefix must be case-insensitive `bytes=`; anything else is
/// unsatisfiable. Each range is `start-end`, `start-`, or `-suffix`.
pub fn parse(header: &str, length: u64) -> RangeParse {
    let Some(rest) = strip_bytes_prefix(header) else {
        return RangeParse::Unsatisfiable;
    };

    if rest.trim().is_empty() {
        return RangeParse::Full;
    }

    let mut ranges = Vec::new();
    for spec in rest.split(',') {
        match parse_one(spec.trim(), length) {
            Some(Some(range)) => ranges.push(range),
            Some(None) => {}
            None => return RangeParse::Unsatisfiable,
        }
    }

    if ranges.is_empty() {
        // Either the header was empty (handled above) or every range in a
        // non-empty list was a zero-length suffix, which is dropped, not
        // unsatisfiable.
        RangeParse::Full
    } else {
        RangeParse::Ranges(ranges)
    }
}

fn strip_bytes_prefix(header: &str) -> Option<&str> {
    let header = header.trim();
    let (prefix, rest) = header.split_once('=')?;
    if prefix.trim().eq_ignore_ascii_case("bytes") {
        Some(rest)
    } else {
        None
    }
}

/// `Some(Some(range))` = a valid non-empty range, `Some(None)` = a valid
/// but empty (dropped) suffix range, `None` = unsatisfiable.
fn parse_one(spec: &str, length: u64) -> Option<Option<ByteRange>> {
    if length == 0 {
        return None;
    }
    if let Some(suffix) = spec.strip_prefix('-') {
        let suffix: u64 = suffix.parse().ok()?;
        if suffix == 0 {
            return Some(None);
        }
        let start = length.saturating_sub(suffix);
        return Some(Some(ByteRange { start, end: length - 1 }));
    }

    let (start_str, end_str) = spec.split_once('-')?;
    let start: u64 = start_str.parse().ok()?;
    if start >= length {
        return None;
    }
    let end = if end_str.is_empty() {
        length - 1
    } else {
        let end: u64 = end_str.parse().ok()?;
        if start > end {
            return None;
        }
        end.min(length - 1)
    };
    Some(Some(ByteRange { start, end }))
}

#[cfg(test)]
#[path = "range_tests.rs"]
mod tests;
