// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! A stand-in for the worker-runtime binary, used only by
//! `crates/supervisor`'s integration tests (via `assert_cmd::cargo_bin!`)
//! to exercise `ProcessApplier`'s control-channel handshake and readiness
//! probe against a real child process instead of an in-memory fake.
//!
//! Controlled entirely through env vars so tests don't need a CLI parser:
//! - `MF_CONTROL_PORT` / `MF_ENTRY_HOST` / `MF_ENTRY_PORT`: where to dial
//!   back and where to serve the entry socket (set by `ProcessApplier`).
//! - `STUB_WORKER_REJECT=1`: answer `SetOptions` with `OptionsRejected`.
//! - `STUB_WORKER_DELAY_MS=<n>`: sleep before answering `SetOptions`, to
//!   simulate a slow worker for supersede/timeout tests.

use mf_wire::{read_message, write_message, ControlRequest, ControlResponse};
use std::convert::Infallible;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[tokio::main]
async fn main() {
    let control_port: u16 = env_var("MF_CONTROL_PORT").parse().expect("MF_CONTROL_PORT is a valid port");
    let entry_host = env_var("MF_ENTRY_HOST");
    let entry_port: u16 = env_var("MF_ENTRY_PORT").parse().expect("MF_ENTRY_PORT is a valid port");

    let mut control = TcpStream::connect(("127.0.0.1", control_port)).await.expect("connect to control socket");

    let entry_listener = TcpListener::bind((entry_host.as_str(), entry_port)).await.expect("bind entry socket");
    let mut applied_version = None;

    loop {
        let request: ControlRequest = match read_message(&mut control).await {
            Ok(request) => request,
            Err(_) => break,
        };
        match request {
            ControlRequest::SetOptions { version, .. } => {
                if let Ok(delay_ms) = std::env::var("STUB_WORKER_DELAY_MS") {
                    let delay_ms: u64 = delay_ms.parse().unwrap_or(0);
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                }
                let response = if std::env::var("STUB_WORKER_REJECT").is_ok() {
                    ControlResponse::OptionsRejected { version, reason: "stub worker configured to reject".to_string() }
                } else {
                    applied_version = Some(version);
                    ControlResponse::OptionsApplied { version }
                };
                if write_message(&mut control, &response).await.is_err() {
                    break;
                }
            }
            ControlRequest::Ping => {
                if write_message(&mut control, &ControlResponse::Pong).await.is_err() {
                    break;
                }
            }
            ControlRequest::Shutdown { .. } => {
                let _ = write_message(&mut control, &ControlResponse::ShuttingDown).await;
                return;
            }
        }

        if applied_version.is_some() {
            break;
        }
    }

    // Past this point we only need to keep serving the entry socket until
    // killed; the control connection is read in the background so a
    // `Shutdown` sent later is still honored.
    tokio::spawn(async move {
        loop {
            match read_message::<_, ControlRequest>(&mut control).await {
                Ok(ControlRequest::Shutdown { .. }) => {
                    let _ = write_message(&mut control, &ControlResponse::ShuttingDown).await;
                    std::process::exit(0);
                }
                Ok(ControlRequest::Ping) => {
                    let _ = write_message(&mut control, &ControlResponse::Pong).await;
                }
                Ok(ControlRequest::SetOptions { version, .. }) => {
                    let _ = write_message(&mut control, &ControlResponse::OptionsApplied { version }).await;
                }
                Err(_) => std::process::exit(0),
            }
        }
    });

    loop {
        let (stream, _) = entry_listener.accept().await.expect("accept entry connection");
        tokio::spawn(serve_entry(stream));
    }
}

async fn serve_entry(mut stream: TcpStream) -> Result<(), Infallible> {
    let mut buf = [0u8; 4096];
    let _ = stream.read(&mut buf).await;
    let _ = stream.write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\n\r\nok").await;
    Ok(())
}

fn env_var(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}
