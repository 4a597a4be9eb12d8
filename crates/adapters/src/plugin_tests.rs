// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;
use mf_config::ScriptSource;
use parking_lot::Mutex;

struct CountingPlugin {
    reset_calls: Mutex<u32>,
}

impl Plugin for CountingPlugin {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn get_bindings(&self, _options: &WorkerOptionsSet, _worker_index: WorkerIndex) -> Vec<Binding> {
        Vec::new()
    }

    fn reset_for_tests(&self) {
        *self.reset_calls.lock() += 1;
    }
}

fn worker() -> WorkerOptionsSet {
    WorkerOptionsSet {
        name: Some("main".to_string()),
        script: ScriptSource::Inline(String::new()),
        module_rules: Vec::new(),
        compatibility_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        compatibility_flags: Vec::new(),
        bindings: Vec::new(),
        durable_objects: Vec::new(),
        queue_producers: Vec::new(),
        queue_consumers: Vec::new(),
    }
}

#[test]
fn default_get_services_is_empty() {
    let plugin = CountingPlugin { reset_calls: Mutex::new(0) };
    let ctx = PluginContext { workers: &[worker()] };
    assert!(plugin.get_services(&ctx).is_empty());
}

#[test]
fn reset_for_tests_is_callable_through_the_trait_object() {
    let plugin = CountingPlugin { reset_calls: Mutex::new(0) };
    let as_trait: &dyn Plugin = &plugin;
    as_trait.reset_for_tests();
    assert_eq!(*plugin.reset_calls.lock(), 1);
}
