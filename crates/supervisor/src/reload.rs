// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Live-reload fan-out (spec.md §4.2 "Live-reload", §5 "hasWaiting"
//! suppression). The loopback server's `/cdn-cgi/mf/reload` WebSocket
//! handler subscribes here and closes with code 1012 on every fire.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct LiveReloadHub {
    sender: broadcast::Sender<()>,
}

impl LiveReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Notify every subscriber that the runtime configuration changed.
    /// Lagging/absent subscribers are not an error: a reload that nobody is
    /// listening for yet is simply a no-op.
    pub fn fire(&self) {
        let _ = self.sender.send(());
    }
}

impl Default for LiveReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "reload_tests.rs"]
mod tests;
