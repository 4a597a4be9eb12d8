// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;

#[yare::parameterized(
    empty = { "" },
    dot = { "." },
    dotdot = { ".." },
)]
fn rejects_reserved_keys(key: &str) {
    assert!(validate_key(key).is_err());
}

#[test]
fn rejects_keys_over_the_byte_limit() {
    let key = "a".repeat(MAX_KEY_BYTES + 1);
    assert!(validate_key(&key).is_err());
}

#[test]
fn accepts_a_key_at_exactly_the_byte_limit() {
    let key = "a".repeat(MAX_KEY_BYTES);
    assert!(validate_key(&key).is_ok());
}

#[test]
fn accepts_ordinary_keys() {
    assert!(validate_key("widgets/1").is_ok());
}
