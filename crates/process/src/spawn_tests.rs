// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

use super::*;
use std::time::Duration;

fn echo_spec(text: &str) -> WorkerSpawnSpec {
    WorkerSpawnSpec {
        program: PathBuf::from("/bin/sh"),
        args: vec!["-c".to_string(), format!("echo {text}")],
        env: HashMap::new(),
        working_dir: None,
    }
}

#[tokio::test]
async fn spawns_and_waits_for_exit() {
    let mut child = spawn_worker(echo_spec("hello")).expect("spawn");
    let status = child.wait().await.expect("wait");
    assert!(status.success());
}

#[tokio::test]
async fn kill_returns_quickly_when_process_exits_within_grace() {
    let mut child = spawn_worker(echo_spec("bye")).expect("spawn");
    child.kill(Duration::from_secs(5)).await.expect("kill");
}

#[tokio::test]
async fn kill_force_kills_after_grace_period_elapses() {
    let spec = WorkerSpawnSpec {
        program: PathBuf::from("/bin/sh"),
        args: vec!["-c".to_string(), "sleep 30".to_string()],
        env: HashMap::new(),
        working_dir: None,
    };
    let mut child = spawn_worker(spec).expect("spawn");
    child.kill(Duration::from_millis(50)).await.expect("kill");
}

#[tokio::test]
async fn try_wait_reports_pid() {
    let child = spawn_worker(echo_spec("pid-check")).expect("spawn");
    assert!(child.id().is_some());
}
