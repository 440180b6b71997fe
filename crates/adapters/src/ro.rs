// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Resource Orchestrator HTTP client: a thin typed wrapper over RO's REST API. Descriptors
//! in and out are opaque `serde_json::Value` documents — the core never validates them, it only
//! moves fields named in the spec (`osm_id`, `uuid`, vim/sdn config) around.

use crate::error::RoError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NsRoState {
    Build,
    Active,
    Error,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VduInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vim_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VnfInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub vdur: HashMap<String, VduInfo>,
}

#[async_trait]
pub trait Ro: Send + Sync {
    async fn create(&self, kind: &str, descriptor: Value) -> Result<Value, RoError>;
    async fn edit(&self, kind: &str, id: &str, descriptor: Value) -> Result<(), RoError>;
    async fn delete(&self, kind: &str, id: &str) -> Result<(), RoError>;
    async fn show(&self, kind: &str, id: &str) -> Result<Value, RoError>;
    async fn get_list(&self, kind: &str, filter_by: Value) -> Result<Vec<Value>, RoError>;
    async fn attach_datacenter(&self, id: &str, descriptor: Value) -> Result<(), RoError>;
    async fn detach_datacenter(&self, id: &str) -> Result<(), RoError>;

    /// Pure classification of an NS descriptor's `status` field; performs no I/O. The poll loop
    /// in the instantiate workflow treats any state besides `Build`/`Active`/`Error` as a
    /// programmer error, matching this crate's `NsRoState` being exhaustive over the three.
    fn check_ns_status(&self, desc: &Value) -> (NsRoState, String);

    async fn get_ns_vnf_info(&self, desc: &Value) -> Result<HashMap<String, VnfInfo>, RoError>;
}

pub fn default_check_ns_status(desc: &Value) -> (NsRoState, String) {
    let status = desc
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("BUILD")
        .to_uppercase();
    let info = desc
        .get("status_info")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let state = match status.as_str() {
        "ACTIVE" => NsRoState::Active,
        "ERROR" => NsRoState::Error,
        "BUILD" | "SCHEDULED" => NsRoState::Build,
        other => unreachable!("RO reported an unrecognized ns status {other:?}"),
    };
    (state, info)
}

pub mod fake;
pub mod http;
