// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;

#[test]
fn replaces_path_separators() {
    assert_eq!(sanitize_namespace("my/ns"), "my_ns");
    assert_eq!(sanitize_namespace("my\\ns"), "my_ns");
}

#[test]
fn strips_leading_dots() {
    assert_eq!(sanitize_namespace("../../etc"), "etc");
    assert_eq!(sanitize_namespace(".."), "_");
    assert_eq!(sanitize_namespace("."), "_");
}

#[test]
fn leaves_ordinary_names_untouched() {
    assert_eq!(sanitize_namespace("my-namespace_1"), "my-namespace_1");
}

#[test]
fn strips_control_characters() {
    assert_eq!(sanitize_key("a\0b\nc"), "a_b_c");
}
