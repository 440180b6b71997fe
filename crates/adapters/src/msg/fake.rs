// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::MsgError;
use crate::msg::{BusMessage, Msg};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, Mutex as AsyncMutex};

/// An in-memory bus: `push` feeds it from test code (standing in for "publishers elsewhere in
/// the system"), `read` drains it the way the dispatch loop would, and `written` records every
/// `write` call so tests can assert on self-pings and other outbound publishes.
///
/// `inbox_rx` is behind a `tokio::sync::Mutex` rather than `parking_lot`'s because the guard is
/// held across the `recv().await` in `read`.
pub struct FakeMsg {
    inbox_tx: mpsc::UnboundedSender<(BusMessage, Value)>,
    inbox_rx: AsyncMutex<mpsc::UnboundedReceiver<(BusMessage, Value)>>,
    written: Mutex<Vec<(String, String, Value)>>,
}

impl Default for FakeMsg {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeMsg {
    pub fn new() -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            inbox_tx,
            inbox_rx: AsyncMutex::new(inbox_rx),
            written: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, topic: impl Into<String>, command: impl Into<String>, params: Value) {
        let _ = self.inbox_tx.send((
            BusMessage {
                topic: topic.into(),
                command: command.into(),
            },
            params,
        ));
    }

    pub fn written(&self) -> Vec<(String, String, Value)> {
        self.written.lock().clone()
    }
}

#[async_trait]
impl Msg for FakeMsg {
    async fn read(&self) -> Result<(BusMessage, Value), MsgError> {
        let mut rx = self.inbox_rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| MsgError::Read("bus closed".to_string()))
    }

    async fn write(&self, topic: &str, command: &str, params: Value) -> Result<(), MsgError> {
        self.written
            .lock()
            .push((topic.to_string(), command.to_string(), params));
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
