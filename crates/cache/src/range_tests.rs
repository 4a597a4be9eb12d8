// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;

#[test]
fn case_insensitive_bytes_prefix() {
    assert_eq!(parse("BYTES=0-9", 100), RangeParse::Ranges(vec![ByteRange { start: 0, end: 9 }]));
}

#[test]
fn non_bytes_unit_is_unsatisfiable() {
    assert_eq!(parse("items=0-9", 100), RangeParse::Unsatisfiable);
}

#[test]
fn empty_range_list_is_full() {
    assert_eq!(parse("bytes=", 100), RangeParse::Full);
}

#[test]
fn start_end_form() {
    assert_eq!(parse("bytes=10-19", 100), RangeParse::Ranges(vec![ByteRange { start: 10, end: 19 }]));
}

#[test]
fn start_only_form_runs_to_end() {
    assert_eq!(parse("bytes=90-", 100), RangeParse::Ranges(vec![ByteRange { start: 90, end: 99 }]));
}

#[test]
fn suffix_form() {
    assert_eq!(parse("bytes=-10", 100), RangeParse::Ranges(vec![ByteRange { start: 90, end: 99 }]));
}

#[test]
fn suffix_exceeding_length_is_entire_response() {
    assert_eq!(parse("bytes=-1000", 100), RangeParse::Ranges(vec![ByteRange { start: 0, end: 99 }]));
}

#[test]
fn zero_suffix_is_dropped_leaving_full_response() {
    assert_eq!(parse("bytes=-0", 100), RangeParse::Full);
}

#[test]
fn start_beyond_length_is_unsatisfiable() {
    assert_eq!(parse("bytes=100-200", 100), RangeParse::Unsatisfiable);
}

#[test]
fn start_greater_than_end_is_unsatisfiable() {
    assert_eq!(parse("bytes=50-10", 100), RangeParse::Unsatisfiable);
}

#[test]
fn end_beyond_length_is_clamped() {
    assert_eq!(parse("bytes=50-1000", 100), RangeParse::Ranges(vec![ByteRange { start: 50, end: 99 }]));
}

#[test]
fn multiple_ranges_preserve_input_order() {
    assert_eq!(
        parse("bytes=0-9,20-29", 100),
        RangeParse::Ranges(vec![ByteRange { start: 0, end: 9 }, ByteRange { start: 20, end: 29 }])
    );
}
