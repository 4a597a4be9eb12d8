// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;
use crate::binding::Binding;
use crate::worker::ScriptSource;
use chrono::NaiveDate;

fn worker(name: &str) -> WorkerOptionsSet {
    WorkerOptionsSet {
        name: Some(name.to_string()),
        script: ScriptSource::Inline("export default { fetch() {} }".to_string()),
        module_rules: Vec::new(),
        compatibility_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        compatibility_flags: Vec::new(),
        bindings: Vec::new(),
        durable_objects: Vec::new(),
        queue_producers: Vec::new(),
        queue_consumers: Vec::new(),
    }
}

#[test]
fn rejects_empty_worker_list() {
    let shared = SharedOptions::default();
    let err = build_service_graph(OptionsVersion::INITIAL, &shared, &[]).unwrap_err();
    assert!(matches!(err, ConfigError::NoWorkers));
}

#[test]
fn rejects_duplicate_worker_names() {
    let shared = SharedOptions::default();
    let workers = vec![worker("a"), worker("a")];
    let err = build_service_graph(OptionsVersion::INITIAL, &shared, &workers).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateWorkerName(n) if n == "a"));
}

#[test]
fn rejects_future_compatibility_date() {
    let shared = SharedOptions::default();
    let mut w = worker("a");
    w.compatibility_date = NaiveDate::from_ymd_opt(2999, 1, 1).expect("valid date");
    let err = build_service_graph(OptionsVersion::INITIAL, &shared, &[w]).unwrap_err();
    assert!(matches!(err, ConfigError::CompatibilityDateInFuture { .. }));
}

#[test]
fn rejects_durable_object_with_non_memory_persistence() {
    let mut shared = SharedOptions::default();
    shared.persistence.insert("durable_objects".to_string(), Some("true".to_string()));
    let mut w = worker("a");
    w.durable_objects.push(DurableObjectClass {
        class_name: "Counter".to_string(),
        script_name: None,
    });
    let err = build_service_graph(OptionsVersion::INITIAL, &shared, &[w]).unwrap_err();
    assert!(matches!(err, ConfigError::DurableObjectPersistenceUnsupported { .. }));
}

#[test]
fn allows_durable_objects_with_memory_persistence() {
    let mut shared = SharedOptions::default();
    shared.persistence.insert("durable_objects".to_string(), Some("false".to_string()));
    let mut w = worker("a");
    w.durable_objects.push(DurableObjectClass {
        class_name: "Counter".to_string(),
        script_name: None,
    });
    let graph = build_service_graph(OptionsVersion::INITIAL, &shared, &[w]).expect("builds");
    assert_eq!(graph.services.len(), 1);
}

#[test]
fn first_worker_is_the_entry_socket_target() {
    let shared = SharedOptions::default();
    let workers = vec![worker("a"), worker("b")];
    let graph = build_service_graph(OptionsVersion::INITIAL, &shared, &workers).expect("builds");
    assert_eq!(graph.sockets.len(), 1);
    assert_eq!(graph.sockets[0].name, "entry");
    assert_eq!(graph.sockets[0].service, "a");
}

#[test]
fn services_are_deduplicated_by_name_first_wins() {
    let shared = SharedOptions::default();
    let workers = vec![worker("a"), worker("a-dup-ignored")];
    // The second worker would collide on "a" only if its name were also
    // "a"; the dedup guard here is exercised through binding-derived
    // service names instead (network appears once across many bindings).
    let mut w1 = workers[0].clone();
    w1.bindings.push(Binding::Service {
        name: "NET".to_string(),
        target: ServiceBindingTarget::Network,
    });
    let mut w2 = workers[1].clone();
    w2.bindings.push(Binding::Service {
        name: "NET2".to_string(),
        target: ServiceBindingTarget::Network,
    });
    let graph = build_service_graph(OptionsVersion::INITIAL, &shared, &[w1, w2]).expect("builds");
    let network_count = graph.services.iter().filter(|s| s.body == ServiceRef::Network).count();
    assert_eq!(network_count, 1);
}

#[test]
fn dead_letter_cycle_does_not_panic_and_resolves() {
    let shared = SharedOptions::default();
    let mut w = worker("a");
    w.queue_consumers.push(QueueConsumer {
        queue: "q1".to_string(),
        dead_letter_queue: Some("q2".to_string()),
        max_retries: None,
    });
    w.queue_consumers.push(QueueConsumer {
        queue: "q2".to_string(),
        dead_letter_queue: Some("q1".to_string()),
        max_retries: None,
    });
    let graph = build_service_graph(OptionsVersion::INITIAL, &shared, &[w]).expect("builds");
    let q1 = graph.queue_dead_letters.find_by_name("q1").expect("q1 present");
    let q2 = graph.queue_dead_letters.find_by_name("q2").expect("q2 present");
    assert_eq!(graph.queue_dead_letters.node(q1).expect("node").dead_letter_queue, Some(q2));
    assert_eq!(graph.queue_dead_letters.node(q2).expect("node").dead_letter_queue, Some(q1));
}
