// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vnfrs` — VNF Records, keyed `{nsr-id-ref, member-vnf-index-ref}`, enriched at runtime
//! with the VIM account and IP addresses assigned once the NS is ACTIVE.

use crate::id::{NsrId, VimAccountId, VnfdId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vdur {
    #[serde(rename = "vdu-id-ref")]
    pub vdu_id_ref: String,
    #[serde(rename = "vim-id", default, skip_serializing_if = "Option::is_none")]
    pub vim_id: Option<String>,
    #[serde(rename = "ip-address", default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VnfRecord {
    #[serde(rename = "nsr-id-ref")]
    pub nsr_id_ref: NsrId,
    #[serde(rename = "member-vnf-index-ref")]
    pub member_vnf_index_ref: String,
    pub vnfd_id: VnfdId,
    #[serde(rename = "vim-account-id", default, skip_serializing_if = "Option::is_none")]
    pub vim_account_id: Option<VimAccountId>,
    #[serde(rename = "ip-address", default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub vdur: Vec<Vdur>,
}
