// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;

fn headers_with(content_encoding: Option<&str>, manual: bool) -> MultiHeaderMap {
    let mut headers = MultiHeaderMap::new();
    if let Some(encoding) = content_encoding {
        headers.insert("content-encoding", encoding);
    }
    if manual {
        headers.insert(MANUAL_ENCODING_HEADER, "true");
    }
    headers
}

#[test]
fn no_content_encoding_header_passes_body_through_unchanged() {
    let outcome = apply(&headers_with(None, false), Bytes::from_static(b"hello"));
    assert_eq!(outcome.body, Bytes::from_static(b"hello"));
    assert!(outcome.content_encoding.is_none());
    assert!(!outcome.recompressed);
}

#[test]
fn gzip_hint_compresses_and_reports_encoding() {
    let outcome = apply(&headers_with(Some("gzip"), false), Bytes::from_static(b"hello world hello world"));
    assert!(outcome.recompressed);
    assert_eq!(outcome.content_encoding.as_deref(), Some("gzip"));
    assert_ne!(outcome.body.as_ref(), b"hello world hello world");
    // gzip magic number
    assert_eq!(&outcome.body[..2], &[0x1f, 0x8b]);
}

#[test]
fn deflate_hint_compresses() {
    let outcome = apply(&headers_with(Some("deflate"), false), Bytes::from_static(b"aaaaaaaaaaaaaaaaaaaa"));
    assert!(outcome.recompressed);
    assert_eq!(outcome.content_encoding.as_deref(), Some("deflate"));
}

#[test]
fn br_hint_compresses() {
    let outcome = apply(&headers_with(Some("br"), false), Bytes::from_static(b"aaaaaaaaaaaaaaaaaaaa"));
    assert!(outcome.recompressed);
    assert_eq!(outcome.content_encoding.as_deref(), Some("br"));
}

#[test]
fn comma_list_of_supported_tokens_applies_each_in_order() {
    let outcome = apply(&headers_with(Some("gzip, deflate"), false), Bytes::from_static(b"payload"));
    assert!(outcome.recompressed);
    assert_eq!(outcome.content_encoding.as_deref(), Some("gzip, deflate"));
}

#[test]
fn unsupported_token_is_forwarded_without_recompression() {
    let outcome = apply(&headers_with(Some("zstd"), false), Bytes::from_static(b"payload"));
    assert!(!outcome.recompressed);
    assert_eq!(outcome.content_encoding.as_deref(), Some("zstd"));
    assert_eq!(outcome.body.as_ref(), b"payload");
}

#[test]
fn manual_encoding_hint_bypasses_recompression_even_for_supported_token() {
    let outcome = apply(&headers_with(Some("gzip"), true), Bytes::from_static(b"already-gzipped-by-caller"));
    assert!(!outcome.recompressed);
    assert_eq!(outcome.content_encoding.as_deref(), Some("gzip"));
    assert_eq!(outcome.body.as_ref(), b"already-gzipped-by-caller");
}
