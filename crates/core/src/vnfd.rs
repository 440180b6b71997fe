// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vnfds` — VNF descriptors.

use crate::id::VnfdId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JujuCharm {
    pub charm: String,
    #[serde(rename = "initial-config-primitive", default, skip_serializing_if = "Vec::is_empty")]
    pub initial_config_primitive: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub juju: Option<JujuCharm>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vdu {
    #[serde(rename = "id")]
    pub vdu_id: String,
    #[serde(rename = "cloud-init-file", default, skip_serializing_if = "Option::is_none")]
    pub cloud_init_file: Option<String>,
    #[serde(rename = "vdu-configuration", default, skip_serializing_if = "Option::is_none")]
    pub vdu_configuration: Option<Configuration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vnfd {
    #[serde(rename = "_id")]
    pub id: VnfdId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vdu: Vec<Vdu>,
    #[serde(rename = "vnf-configuration", default, skip_serializing_if = "Option::is_none")]
    pub vnf_configuration: Option<Configuration>,
    /// Everything else is carried through to RO untouched.
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl Vnfd {
    /// Every juju charm named anywhere in this descriptor: the top-level `vnf-configuration`
    /// charm (if any) followed by each `vdu`'s `vdu-configuration` charm, in `vdu` order.
    pub fn charms(&self) -> Vec<&JujuCharm> {
        let mut out = Vec::new();
        if let Some(c) = self.vnf_configuration.as_ref().and_then(|c| c.juju.as_ref()) {
            out.push(c);
        }
        for vdu in &self.vdu {
            if let Some(c) = vdu.vdu_configuration.as_ref().and_then(|c| c.juju.as_ref()) {
                out.push(c);
            }
        }
        out
    }
}
