// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The command bus collaborator: `(topic, command, params)` tuples in, out-of-band publishes
//! out (the self-ping, and whatever else the system at large listens for).

use crate::error::MsgError;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub topic: String,
    pub command: String,
}

#[async_trait]
pub trait Msg: Send + Sync {
    /// Blocks until the next message is available.
    async fn read(&self) -> Result<(BusMessage, Value), MsgError>;
    async fn write(&self, topic: &str, command: &str, params: Value) -> Result<(), MsgError>;
}

pub mod fake;
pub mod local;
