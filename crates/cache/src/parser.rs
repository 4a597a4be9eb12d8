// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! A minimal HTTP/1.1 response parser for the bytes a `PUT` supplies
//! (spec.md §4.4: "an internal single-connection HTTP parser that reads
//! into its own loopback socket"). Only status line, headers, and body are
//! needed here; chunked transfer-encoding is not reproduced since the
//! loopback socket hands over an already-framed body.

use bytes::Bytes;
use mf_wire::MultiHeaderMap;

pub struct ParsedResponse {
    pub status: u16,
    pub headers: MultiHeaderMap,
    pub body: Bytes,
}

/// Parse `bytes` as `<status-line>\r\n(<header>\r\n)*\r\n<body>`.
pub fn parse(bytes: &[u8]) -> Result<ParsedResponse, crate::error::CacheError> {
    let text_boundary = find_header_end(bytes)
        .ok_or_else(|| crate::error::CacheError::MalformedResponse("no header terminator".into()))?;
    let head = std::str::from_utf8(&bytes[..text_boundary])
        .map_err(|e| crate::error::CacheError::MalformedResponse(e.to_string()))?;
    let body = Bytes::copy_from_slice(&bytes[text_boundary..]);

    let mut lines = head.split("\r\n");
    let status_line = lines
        .next()
        .ok_or_else(|| crate::error::CacheError::MalformedResponse("missing status line".into()))?;
    let status = parse_status_line(status_line)?;

    let mut headers = MultiHeaderMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| crate::error::CacheError::MalformedResponse(format!("bad header line {line:?}")))?;
        headers.insert(name.trim(), value.trim().to_string());
    }

    Ok(ParsedResponse { status, headers, body })
}

fn parse_status_line(line: &str) -> Result<u16, crate::error::CacheError> {
    let mut parts = line.split_whitespace();
    let _version = parts.next();
    let status = parts
        .next()
        .ok_or_else(|| crate::error::CacheError::MalformedResponse("missing status code".into()))?;
    status
        .parse()
        .map_err(|_| crate::error::CacheError::MalformedResponse(format!("bad status code {status:?}")))
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
