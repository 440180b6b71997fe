// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vim_accounts` — tenant credentials and configuration for a virtual-infrastructure manager.

use crate::id::{SdnId, VimAccountId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationalState {
    Processing,
    Enabled,
    Error,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VimAdminDeployed {
    /// RO-assigned uuid for this VIM, once `vim_create` has created it at RO.
    #[serde(rename = "RO", skip_serializing_if = "Option::is_none")]
    pub ro: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VimAdmin {
    pub deployed: VimAdminDeployed,
    #[serde(rename = "operationalState")]
    pub operational_state: OperationalState,
    #[serde(rename = "detailed-status", default)]
    pub detailed_status: String,
}

impl Default for VimAdmin {
    fn default() -> Self {
        Self {
            deployed: VimAdminDeployed::default(),
            operational_state: OperationalState::Processing,
            detailed_status: String::new(),
        }
    }
}

/// Nested `config` block of a VIM account; the only fields the workflows touch directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VimConfig {
    #[serde(rename = "sdn-controller", skip_serializing_if = "Option::is_none")]
    pub sdn_controller: Option<SdnId>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VimAccount {
    #[serde(rename = "_id")]
    pub id: VimAccountId,
    pub vim_type: String,
    pub vim_tenant_name: String,
    pub vim_user: String,
    pub vim_password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<VimConfig>,
    #[serde(rename = "_admin")]
    pub admin: VimAdmin,
}
