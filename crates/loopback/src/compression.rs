// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Response body compression (spec.md §4.2 "Response translation"):
//! `Content-Encoding` on a plugin/worker response is a *request* to
//! compress the body on the way out, honored for `gzip`, `deflate`, `br`,
//! or a comma list whose tokens are all supported; the "manual encoding"
//! hint bypasses this when the body is already pre-encoded.

use bytes::Bytes;
use flate2::write::{DeflateEncoder, GzEncoder};
use flate2::Compression;
use mf_wire::MultiHeaderMap;
use std::io::Write;

/// Set by the worker to signal a response body it already compressed
/// itself; re-encoding must be skipped even if `Content-Encoding` names a
/// supported token (spec.md §4.2 "manual encoding hint").
pub const MANUAL_ENCODING_HEADER: &str = "mf-manual-encoding";

const SUPPORTED: &[&str] = &["gzip", "deflate", "br"];

pub struct CompressionOutcome {
    pub body: Bytes,
    /// `Content-Encoding` value to set on the outgoing response, if any.
    pub content_encoding: Option<String>,
    /// Whether the body was recompressed here (and should therefore be
    /// sent without a stale `Content-Length`, per spec.md §4.2).
    pub recompressed: bool,
}

/// Apply (or bypass) compression per the response's declared
/// `Content-Encoding` and manual-encoding hint.
pub fn apply(headers: &MultiHeaderMap, body: Bytes) -> CompressionOutcome {
    let manual = headers
        .get(MANUAL_ENCODING_HEADER)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let declared = headers.get("content-encoding").map(str::to_string);

    if manual {
        return CompressionOutcome { body, content_encoding: declared, recompressed: false };
    }

    let Some(declared) = declared else {
        return CompressionOutcome { body, content_encoding: None, recompressed: false };
    };

    let tokens: Vec<&str> = declared.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() || !tokens.iter().all(|t| SUPPORTED.contains(&t.to_ascii_lowercase().as_str())) {
        return CompressionOutcome { body, content_encoding: Some(declared), recompressed: false };
    }

    let mut encoded = body.to_vec();
    for token in &tokens {
        encoded = compress_one(&token.to_ascii_lowercase(), &encoded);
    }
    CompressionOutcome { body: Bytes::from(encoded), content_encoding: Some(declared), recompressed: true }
}

/// Falls back to the uncompressed input on an encoder error; in-memory
/// `Vec<u8>` sinks don't fail in practice, so this path is unreachable
/// outside pathological allocator failure.
fn compress_one(token: &str, input: &[u8]) -> Vec<u8> {
    match token {
        "gzip" => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(input)
                .and_then(|()| encoder.finish())
                .unwrap_or_else(|_| input.to_vec())
        }
        "deflate" => {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(input)
                .and_then(|()| encoder.finish())
                .unwrap_or_else(|_| input.to_vec())
        }
        "br" => {
            let mut out = Vec::new();
            let params = brotli::enc::BrotliEncoderParams::default();
            match brotli::BrotliCompress(&mut std::io::Cursor::new(input), &mut out, &params) {
                Ok(_) => out,
                Err(_) => input.to_vec(),
            }
        }
        _ => input.to_vec(),
    }
}

#[cfg(test)]
#[path = "compression_tests.rs"]
mod tests;
