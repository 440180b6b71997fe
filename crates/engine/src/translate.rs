// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Descriptor translation: turning a stored `Vnfd`/`instantiate_params` into the shape RO
//! expects. Both functions are pure given their inputs (`vnfd2_ro` only performs the one `Fs`
//! read each cloud-init file needs) so crash-recovery re-runs reproduce the same RO payload.

use crate::error::LcmError;
use lcm_adapters::{Db, Fs};
use lcm_core::Vnfd;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Shallow-strips `_id`/`_admin`, optionally overrides `id`, and inlines every VDU's
/// `cloud-init-file` as `cloud-init` text read through `Fs`. The file handle `Fs` opens is
/// released as soon as the read completes — there is no handle held across the call.
pub async fn vnfd2_ro(
    fs: &dyn Fs,
    vnfd: &Vnfd,
    new_id: Option<&str>,
    storage_folder: &str,
    storage_pkg_dir: &str,
) -> Result<Value, LcmError> {
    let mut doc = serde_json::to_value(vnfd)
        .map_err(|e| LcmError::Validation(format!("vnfd {} is not serializable: {e}", vnfd.id)))?;

    let obj = doc
        .as_object_mut()
        .ok_or_else(|| LcmError::Validation("vnfd did not serialize to an object".to_string()))?;
    obj.remove("_id");
    obj.remove("_admin");
    obj.insert(
        "id".to_string(),
        Value::String(new_id.unwrap_or(vnfd.id.as_str()).to_string()),
    );

    if let Some(vdus) = obj.get_mut("vdu").and_then(Value::as_array_mut) {
        for vdu in vdus.iter_mut() {
            let file = vdu
                .get("cloud-init-file")
                .and_then(Value::as_str)
                .map(str::to_string);
            let Some(file) = file else { continue };
            let path = format!("{storage_folder}/{storage_pkg_dir}/cloud_init/{file}");
            let bytes = fs.read_file(&path).await?;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            if let Some(vdu_obj) = vdu.as_object_mut() {
                vdu_obj.remove("cloud-init-file");
                vdu_obj.insert("cloud-init".to_string(), Value::String(text));
            }
        }
    }

    Ok(doc)
}

async fn resolve_vim_ro_id(
    db: &dyn Db,
    cache: &mut HashMap<String, String>,
    vim_account_id: &str,
) -> Result<String, LcmError> {
    if let Some(id) = cache.get(vim_account_id) {
        return Ok(id.clone());
    }
    let doc = db.get_one("vim_accounts", vim_account_id).await?;
    let state = doc
        .pointer("/_admin/operationalState")
        .and_then(Value::as_str)
        .unwrap_or("");
    if state != "ENABLED" {
        return Err(LcmError::Validation(format!(
            "vim account {vim_account_id} is not ENABLED"
        )));
    }
    let ro_id = doc
        .pointer("/_admin/deployed/RO")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            LcmError::Validation(format!("vim account {vim_account_id} has no RO id"))
        })?
        .to_string();
    cache.insert(vim_account_id.to_string(), ro_id.clone());
    Ok(ro_id)
}

/// Translates `nsrs.instantiate_params` into the `{datacenter, vnfs, networks, cloud-config?}`
/// RO expects `ns.create` to receive. Returns `None` when `ns_params` carries nothing (RO's
/// `create("ns", …)` then omits the `instantiate_params`-derived hints entirely).
pub async fn ns_params_2_ro(db: &dyn Db, ns_params: &Value) -> Result<Option<Value>, LcmError> {
    let Some(obj) = ns_params.as_object() else {
        return Ok(None);
    };
    if obj.is_empty() {
        return Ok(None);
    }

    let mut cache = HashMap::new();
    let mut out = serde_json::Map::new();

    if let Some(top_vim) = obj.get("vimAccountId").and_then(Value::as_str) {
        let ro_id = resolve_vim_ro_id(db, &mut cache, top_vim).await?;
        out.insert("datacenter".to_string(), Value::String(ro_id));
    }

    if let Some(vnfs) = obj.get("vnf") {
        out.insert("vnfs".to_string(), vnfs.clone());
    }

    let mut networks = Vec::new();
    if let Some(vlds) = obj.get("vld").and_then(Value::as_array) {
        for vld in vlds {
            let Some(net_name) = vld.get("vim-network-name") else {
                continue;
            };
            let mut sites = Vec::new();
            match net_name {
                Value::Object(map) => {
                    for (vim_account, vim_net) in map {
                        let ro_id = resolve_vim_ro_id(db, &mut cache, vim_account).await?;
                        sites.push(json!({"netmap-use": vim_net, "datacenter": ro_id}));
                    }
                }
                Value::String(vim_net) => {
                    sites.push(json!({"netmap-use": vim_net}));
                }
                _ => {}
            }
            networks.push(json!({"name": vld.get("name"), "sites": sites}));
        }
    }
    if !networks.is_empty() {
        out.insert("networks".to_string(), Value::Array(networks));
    }

    if let Some(cc) = obj.get("cloud-config") {
        out.insert("cloud-config".to_string(), cc.clone());
    }

    Ok(Some(Value::Object(out)))
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod tests;
