// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;

#[test]
fn options_version_next_increments() {
    let v = OptionsVersion::INITIAL;
    assert_eq!(v.next(), OptionsVersion(1));
    assert_eq!(v.next().next(), OptionsVersion(2));
}

#[test]
fn options_version_orders_numerically() {
    assert!(OptionsVersion(1) < OptionsVersion(2));
}

#[test]
fn plugin_name_from_str() {
    let name: PluginName = "cache".into();
    assert_eq!(name.to_string(), "cache");
}

#[test]
fn namespace_name_from_str() {
    let ns: NamespaceName = "my-namespace".into();
    assert_eq!(ns.to_string(), "my-namespace");
}

#[test]
fn worker_index_displays_as_number() {
    assert_eq!(WorkerIndex(3).to_string(), "3");
}
