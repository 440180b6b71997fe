// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `local` `Msg` driver: a single-process loopback bus. `write` enqueues directly onto the
//! queue `read` drains, so the dispatch loop observes its own self-pings without an external
//! broker — the only `message` driver this rewrite ships a production backend for.

use crate::error::MsgError;
use crate::msg::{BusMessage, Msg};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};

pub struct LocalMsg {
    tx: mpsc::UnboundedSender<(BusMessage, Value)>,
    rx: Mutex<mpsc::UnboundedReceiver<(BusMessage, Value)>>,
}

impl Default for LocalMsg {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalMsg {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx: Mutex::new(rx) }
    }
}

#[async_trait]
impl Msg for LocalMsg {
    async fn read(&self) -> Result<(BusMessage, Value), MsgError> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or_else(|| MsgError::Read("bus closed".to_string()))
    }

    async fn write(&self, topic: &str, command: &str, params: Value) -> Result<(), MsgError> {
        self.tx
            .send((
                BusMessage {
                    topic: topic.to_string(),
                    command: command.to_string(),
                },
                params,
            ))
            .map_err(|e| MsgError::Write(e.to_string()))
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
