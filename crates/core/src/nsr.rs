// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nsrs` — NS Records, the primary aggregate the instantiate/terminate/action workflows drive.

use crate::id::{NsrId, VnfdId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstituentVnfd {
    #[serde(rename = "vnfd-id-ref")]
    pub vnfd_id_ref: VnfdId,
    #[serde(rename = "member-vnf-index")]
    pub member_vnf_index: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NsDescriptor {
    #[serde(rename = "constituent-vnfd", default)]
    pub constituent_vnfd: Vec<ConstituentVnfd>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoNsrStatus {
    Scheduled,
    Build,
    Active,
    Error,
    Deleted,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployedRo {
    /// VNFD-id (stringified) -> RO uuid.
    #[serde(default)]
    pub vnfd_id: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsd_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsr_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsr_status: Option<RoNsrStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcaOperationalStatus {
    Init,
    Waiting,
    Maintenance,
    Blocked,
    Active,
    Error,
    Terminated,
    Removing,
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcaDeployment {
    pub model: String,
    pub application: String,
    pub vnfd_id: VnfdId,
    #[serde(rename = "operational-status")]
    pub operational_status: VcaOperationalStatus,
    #[serde(rename = "detailed-status", default)]
    pub detailed_status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VduIp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vim_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VnfIp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub vdur: HashMap<String, VduIp>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deployed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "RO", default)]
    pub ro: DeployedRo,
    /// member-vnf-index -> per-VNF/VDU IP info. Canonical path is `_admin.deployed.nsr_ip`;
    /// an earlier revision wrote this to a sibling `nsr_lcm` field instead, which readers never
    /// looked at — this rewrite only ever touches this field.
    #[serde(default)]
    pub nsr_ip: HashMap<String, VnfIp>,
    /// member-vnf-index -> deployed charm state.
    #[serde(rename = "VCA", default)]
    pub vca: HashMap<String, VcaDeployment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NsState {
    NotInstantiated,
    Instantiated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NsrAdmin {
    pub deployed: Deployed,
    #[serde(rename = "nsState")]
    pub ns_state: NsState,
}

impl Default for NsrAdmin {
    fn default() -> Self {
        Self {
            deployed: Deployed::default(),
            ns_state: NsState::NotInstantiated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationalStatus {
    Init,
    Running,
    Terminating,
    Terminated,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigStatus {
    Init,
    /// `configuring: <phase>: <n>`, rendered via `Display`.
    Configuring(String),
    Configured,
    Failed,
    Terminating,
}

impl std::fmt::Display for ConfigStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStatus::Init => write!(f, "init"),
            ConfigStatus::Configuring(detail) => write!(f, "configuring: {detail}"),
            ConfigStatus::Configured => write!(f, "configured"),
            ConfigStatus::Failed => write!(f, "failed"),
            ConfigStatus::Terminating => write!(f, "terminating"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nsr {
    #[serde(rename = "_id")]
    pub id: NsrId,
    pub name: String,
    pub nsd: NsDescriptor,
    #[serde(default)]
    pub instantiate_params: serde_json::Value,
    #[serde(rename = "operational-status")]
    pub operational_status: OperationalStatus,
    #[serde(rename = "config-status")]
    pub config_status: ConfigStatus,
    #[serde(rename = "detailed-status", default)]
    pub detailed_status: String,
    #[serde(rename = "_admin")]
    pub admin: NsrAdmin,
}

#[cfg(test)]
#[path = "nsr_tests.rs"]
mod tests;
