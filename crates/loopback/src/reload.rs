// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! The `/cdn-cgi/mf/reload` live-reload socket (spec.md §4.2 "Live-reload").
//! Every connected client is held open until a reload fires on the
//! supervisor's broadcast channel, at which point the socket is closed with
//! code 1012 ("Service Restart") so the client's own reconnect logic kicks
//! in against the freshly-applied options.

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::state::LoopbackState;

const RESTART_CLOSE_CODE: u16 = 1012;
const RESTART_CLOSE_REASON: &str = "Service Restart";

pub async fn upgrade(State(state): State<Arc<LoopbackState>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<LoopbackState>) {
    let mut reload_rx = (state.reload_subscribe)();

    loop {
        tokio::select! {
            reload = reload_rx.recv() => {
                match reload {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        let _ = socket
                            .send(Message::Close(Some(CloseFrame {
                                code: RESTART_CLOSE_CODE,
                                reason: RESTART_CLOSE_REASON.into(),
                            })))
                            .await;
                        return;
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Ok(_)) => continue,
                    Some(Err(_)) => return,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "reload_tests.rs"]
mod tests;
