// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sdns` — Software-Defined-Networking controllers, same admin shape as a VIM account.

use crate::id::SdnId;
use crate::vim_account::{OperationalState, VimAdminDeployed};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdnAdmin {
    pub deployed: VimAdminDeployed,
    #[serde(rename = "operationalState")]
    pub operational_state: OperationalState,
    #[serde(rename = "detailed-status", default)]
    pub detailed_status: String,
}

impl Default for SdnAdmin {
    fn default() -> Self {
        Self {
            deployed: VimAdminDeployed::default(),
            operational_state: OperationalState::Processing,
            detailed_status: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sdn {
    #[serde(rename = "_id")]
    pub id: SdnId,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "_admin")]
    pub admin: SdnAdmin,
}
