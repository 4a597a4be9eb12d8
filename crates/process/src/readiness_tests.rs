// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;
use std::thread;
use tiny_http::{Response, Server};

#[tokio::test]
async fn succeeds_once_server_answers() {
    let server = Server::http("127.0.0.1:0").expect("server");
    let addr = server.server_addr().to_string();
    let url = format!("http://{addr}/");

    let handle = thread::spawn(move || {
        let req = server.recv().expect("request");
        req.respond(Response::from_string("ok")).expect("respond");
    });

    let (_exit_tx, exit_rx) = watch::channel(false);
    let (_abort_tx, abort_rx) = watch::channel(false);
    let schedule = ReadinessSchedule::default();

    let ready = wait_for_ready(&url, OptionsVersion(1), &schedule, exit_rx, abort_rx)
        .await
        .expect("probe result");
    assert!(ready);
    handle.join().expect("join");
}

#[tokio::test]
async fn aborts_promptly_when_signalled() {
    // Nothing is listening on this port, so every attempt is a connection
    // refusal; the probe must still stop quickly once aborted.
    let url = "http://127.0.0.1:1".to_string();
    let (_exit_tx, exit_rx) = watch::channel(false);
    let (abort_tx, abort_rx) = watch::channel(false);
    let schedule = ReadinessSchedule::default();

    let probe = tokio::spawn(async move {
        wait_for_ready(&url, OptionsVersion(1), &schedule, exit_rx, abort_rx).await
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    abort_tx.send(true).expect("send abort");

    let ready = tokio::time::timeout(Duration::from_secs(2), probe)
        .await
        .expect("probe finished in time")
        .expect("task join")
        .expect("probe result");
    assert!(!ready);
}

#[tokio::test]
async fn stops_when_child_exits() {
    let url = "http://127.0.0.1:1".to_string();
    let (exit_tx, exit_rx) = watch::channel(false);
    let (_abort_tx, abort_rx) = watch::channel(false);
    let schedule = ReadinessSchedule::default();

    let probe = tokio::spawn(async move {
        wait_for_ready(&url, OptionsVersion(1), &schedule, exit_rx, abort_rx).await
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    exit_tx.send(true).expect("send exit");

    let ready = tokio::time::timeout(Duration::from_secs(2), probe)
        .await
        .expect("probe finished in time")
        .expect("task join")
        .expect("probe result");
    assert!(!ready);
}

#[test]
fn schedule_has_expected_step_counts() {
    let schedule = ReadinessSchedule::default();
    let first_forty: Vec<Duration> = schedule.delays().take(30).collect();
    assert_eq!(first_forty[0], Duration::from_millis(10));
    assert_eq!(first_forty[9], Duration::from_millis(10));
    assert_eq!(first_forty[10], Duration::from_millis(50));
    assert_eq!(first_forty[19], Duration::from_millis(50));
    assert_eq!(first_forty[20], Duration::from_millis(100));
    assert_eq!(first_forty[29], Duration::from_millis(100));
    let tail: Vec<Duration> = schedule.delays().skip(30).take(3).collect();
    assert_eq!(tail, vec![Duration::from_secs(1); 3]);
}
