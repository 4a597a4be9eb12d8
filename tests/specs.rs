// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Workspace-level integration specs: exercise the `mf-dev` binary as a
//! whole (config loading, supervisor startup, worker-runtime handshake)
//! against the `stub_worker` stand-in from `crates/supervisor`, rather than
//! any single crate's unit tests.

use serde_json::json;
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

struct DevProcess {
    child: Child,
}

impl Drop for DevProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn worker_config_document() -> serde_json::Value {
    json!({
        "workers": [{
            "name": "main",
            "script": { "kind": "inline", "value": "export default { fetch() {} }" },
            "module_rules": [],
            "compatibility_date": "2024-01-01",
            "compatibility_flags": [],
            "bindings": [],
            "durable_objects": [],
            "queue_producers": [],
            "queue_consumers": [],
        }],
    })
}

/// Spawns `mf-dev` wired to `stub_worker` with a minimal one-worker config,
/// and blocks until either the "worker runtime ready" log line appears on
/// stdout or `STARTUP_TIMEOUT` elapses.
fn start_dev(temp: &tempfile::TempDir, extra_env: &[(&str, &str)]) -> (DevProcess, BufReader<std::process::ChildStdout>) {
    let config_path = temp.path().join("config.json");
    std::fs::write(&config_path, worker_config_document().to_string()).expect("write config");

    let mut command = Command::new(assert_cmd::cargo::cargo_bin!("mf-dev"));
    command
        .env("MF_CONFIG", &config_path)
        .env("MF_STATE_DIR", temp.path())
        .env("MF_RUNTIME_PROGRAM", assert_cmd::cargo::cargo_bin!("stub_worker"))
        .env("RUST_LOG", "info")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in extra_env {
        command.env(key, value);
    }

    let mut child = command.spawn().expect("spawn mf-dev");
    let stdout = child.stdout.take().expect("piped stdout");
    let mut reader = BufReader::new(stdout);

    let deadline = Instant::now() + STARTUP_TIMEOUT;
    let mut saw_ready = false;
    let mut line = String::new();
    while Instant::now() < deadline {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                if line.contains("worker runtime ready") {
                    saw_ready = true;
                    break;
                }
            }
            Err(_) => break,
        }
    }
    assert!(saw_ready, "mf-dev did not report readiness within {STARTUP_TIMEOUT:?}");
    (DevProcess { child }, reader)
}

#[test]
fn mf_dev_starts_the_configured_worker_and_reports_readiness() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (_dev, _stdout) = start_dev(&temp, &[]);
}

#[test]
fn mf_dev_fails_fast_without_a_config_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = Command::new(assert_cmd::cargo::cargo_bin!("mf-dev"))
        .env_remove("MF_CONFIG")
        .env("MF_STATE_DIR", temp.path())
        .env("MF_RUNTIME_PROGRAM", assert_cmd::cargo::cargo_bin!("stub_worker"))
        .output()
        .expect("run mf-dev");
    assert!(!output.status.success(), "mf-dev should exit non-zero without MF_CONFIG");
}

#[test]
fn mf_dev_rejects_a_malformed_config_document() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config_path = temp.path().join("config.json");
    std::fs::write(&config_path, "not json").expect("write config");

    let output = Command::new(assert_cmd::cargo::cargo_bin!("mf-dev"))
        .env("MF_CONFIG", &config_path)
        .env("MF_STATE_DIR", temp.path())
        .env("MF_RUNTIME_PROGRAM", assert_cmd::cargo::cargo_bin!("stub_worker"))
        .output()
        .expect("run mf-dev");
    assert!(!output.status.success(), "mf-dev should exit non-zero on a malformed config document");
}
