// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;

#[test]
fn minimal_document_fills_in_defaults() {
    let config = parse_config("{}").expect("empty document parses");
    assert_eq!(config.shared.host, None);
    assert!(config.workers.is_empty());
}

#[test]
fn shared_options_are_read_from_the_document() {
    let raw = serde_json::json!({
        "shared": { "host": "0.0.0.0", "port": 8787, "live_reload": true },
    })
    .to_string();
    let config = parse_config(&raw).expect("well-formed document parses");
    assert_eq!(config.shared.host.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.shared.port, Some(8787));
    assert!(config.shared.live_reload);
}

#[test]
fn malformed_json_is_rejected() {
    assert!(parse_config("not json").is_err());
}
