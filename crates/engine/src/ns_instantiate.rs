// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The NS instantiate workflow: the nine-phase state machine that registers VNFDs and an NSD
//! at RO, creates (or recovers) the NS, polls it to ACTIVE, enriches VNF records, and fans out
//! VCA charm deploys.

use crate::callback::{task_completed, TaskKind};
use crate::context::LcmContext;
use crate::error::LcmError;
use crate::registry::{TaskHandle, Topic};
use crate::translate::{ns_params_2_ro, vnfd2_ro};
use lcm_adapters::{NsRoState, RoError, VnfInfo};
use lcm_core::Vnfd;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

const NSRS: &str = "nsrs";
const NSLCMOPS: &str = "nslcmops";
const VNFRS: &str = "vnfrs";
const VNFDS: &str = "vnfds";

/// `vnfrs` has no single natural primary key in the source data model (it's queried by the pair
/// `{nsr-id-ref, member-vnf-index-ref}`); this rewrite's `Db` is keyed by a single document id,
/// so workflows address a VNF record by this synthesized composite.
pub fn vnfr_doc_id(nsr_id: &str, member_vnf_index: &str) -> String {
    format!("{nsr_id}:{member_vnf_index}")
}

/// RO identity for a VNFD/NSD instance: `"{nsr_id}.{component_id[:200]}"`. The 200-character
/// truncation is load-bearing for crash recovery — it must match exactly what a prior attempt
/// would have computed for the same descriptor.
fn osm_id(nsr_id: &str, component_id: &str) -> String {
    let truncated: String = component_id.chars().take(200).collect();
    format!("{nsr_id}.{truncated}")
}

pub async fn ns_instantiate(
    ctx: &Arc<LcmContext>,
    nsr_id: &str,
    nslcmop_id: &str,
    order_id: u64,
    storage_folder: &str,
    storage_pkg_dir: &str,
) -> Result<(), LcmError> {
    // Registered under its own task name so a `cancel_tasks(Topic::Ns, nsr_id)` (from an
    // `ns terminate` racing this instantiate) trips a token `run` actually checks, distinct
    // from the dispatch loop's own outer supervision handle for this workflow.
    let handle = TaskHandle::new();
    let token = handle.token.clone();
    ctx.registry.register(Topic::Ns, nsr_id, order_id, "instantiate_poll", handle);

    match run(ctx, nsr_id, nslcmop_id, order_id, &token, storage_folder, storage_pkg_dir).await {
        Ok(()) => Ok(()),
        Err((step, err)) => {
            if token.is_cancelled() {
                tracing::info!(nsr_id, "ns_instantiate cancelled, skipping error trail");
                return Ok(());
            }
            record_failure(ctx, nsr_id, nslcmop_id, &step, &err).await;
            Err(err)
        }
    }
}

async fn record_failure(ctx: &LcmContext, nsr_id: &str, nslcmop_id: &str, step: &str, err: &LcmError) {
    let now = ctx.clock.now();
    let _ = ctx
        .db
        .set_one(NSRS, nsr_id, "detailed-status", json!(format!("ERROR {step}: {err}")))
        .await;
    let _ = ctx.db.set_one(NSRS, nsr_id, "operational-status", json!("failed")).await;
    let _ = ctx
        .db
        .set_one(NSLCMOPS, nslcmop_id, "detailed-status", json!(format!("FAILED {step}: {err}")))
        .await;
    let _ = ctx.db.set_one(NSLCMOPS, nslcmop_id, "operationState", json!("FAILED")).await;
    let _ = ctx
        .db
        .set_one(NSLCMOPS, nslcmop_id, "statusEnteredTime", json!(now.to_rfc3339()))
        .await;
}

fn constituents(nsr_doc: &Value) -> Vec<(String, String)> {
    nsr_doc
        .pointer("/nsd/constituent-vnfd")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|c| {
                    let vnfd_id = c.get("vnfd-id-ref")?.as_str()?.to_string();
                    let idx = c.get("member-vnf-index")?.as_str()?.to_string();
                    Some((vnfd_id, idx))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
async fn run(
    ctx: &Arc<LcmContext>,
    nsr_id: &str,
    nslcmop_id: &str,
    order_id: u64,
    token: &CancellationToken,
    storage_folder: &str,
    storage_pkg_dir: &str,
) -> Result<(), (String, LcmError)> {
    // 1. Load.
    let step = "loading ns record".to_string();
    let mut nsr_doc = ctx.db.get_one(NSRS, nsr_id).await.map_err(|e| (step.clone(), e.into()))?;
    let constituents = constituents(&nsr_doc);

    if nsr_doc.pointer("/_admin/deployed/id").and_then(Value::as_str).is_none() {
        let init = json!({
            "id": nsr_id,
            "RO": {"vnfd_id": {}, "nsd_id": Value::Null, "nsr_id": Value::Null, "nsr_status": "SCHEDULED"},
            "nsr_ip": {},
            "VCA": {},
        });
        ctx.db
            .set_one(NSRS, nsr_id, "_admin.deployed", init)
            .await
            .map_err(|e| (step.clone(), e.into()))?;
    }
    ctx.db
        .set_one(NSRS, nsr_id, "operational-status", json!("init"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(NSRS, nsr_id, "detailed-status", json!("creating"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    nsr_doc = ctx.db.get_one(NSRS, nsr_id).await.map_err(|e| (step, e.into()))?;

    // 2. Register VNFDs at RO.
    let step = "registering VNFDs at RO".to_string();
    let mut vnfd_ro_ids: HashMap<String, String> = HashMap::new();
    let mut distinct_vnfd_ids: Vec<String> = Vec::new();
    for (vnfd_id, _) in &constituents {
        if !distinct_vnfd_ids.contains(vnfd_id) {
            distinct_vnfd_ids.push(vnfd_id.clone());
        }
    }
    for vnfd_id in &distinct_vnfd_ids {
        let vnfd_doc = ctx.db.get_one(VNFDS, vnfd_id).await.map_err(|e| (step.clone(), e.into()))?;
        let vnfd: Vnfd = serde_json::from_value(vnfd_doc)
            .map_err(|e| (step.clone(), LcmError::Validation(format!("vnfd {vnfd_id} did not parse: {e}"))))?;
        let ro_id = osm_id(nsr_id, vnfd_id);
        let existing = ctx
            .ro
            .get_list("vnfd", json!({"osm_id": ro_id}))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
        let ro_uuid = if let Some(found) = existing.first() {
            found.get("uuid").and_then(Value::as_str).unwrap_or_default().to_string()
        } else {
            let mut payload = vnfd2_ro(ctx.fs.as_ref(), &vnfd, Some(&ro_id), storage_folder, storage_pkg_dir)
                .await
                .map_err(|e| (step.clone(), e))?;
            if let Some(obj) = payload.as_object_mut() {
                obj.insert("osm_id".to_string(), json!(ro_id));
            }
            let created = ctx.ro.create("vnfd", payload).await.map_err(|e| (step.clone(), e.into()))?;
            ctx.db
                .set_one(NSRS, nsr_id, "_admin.nsState", json!("INSTANTIATED"))
                .await
                .map_err(|e| (step.clone(), e.into()))?;
            created.get("uuid").and_then(Value::as_str).unwrap_or_default().to_string()
        };
        ctx.db
            .set_one(NSRS, nsr_id, &format!("_admin.deployed.RO.vnfd_id.{vnfd_id}"), json!(ro_uuid.clone()))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
        vnfd_ro_ids.insert(vnfd_id.clone(), ro_uuid);
    }

    // 3. Register NSD at RO.
    let step = "registering NSD at RO".to_string();
    let nsd_id = nsr_doc.pointer("/nsd/_id").and_then(Value::as_str).unwrap_or(nsr_id).to_string();
    let nsd_ro_id = osm_id(nsr_id, &nsd_id);
    let existing_nsd = ctx
        .ro
        .get_list("nsd", json!({"osm_id": nsd_ro_id}))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    let ro_nsd_id = if let Some(found) = existing_nsd.first() {
        found.get("uuid").and_then(Value::as_str).unwrap_or_default().to_string()
    } else {
        let mut nsd_payload = nsr_doc.get("nsd").cloned().unwrap_or_else(|| json!({}));
        if let Some(obj) = nsd_payload.as_object_mut() {
            obj.remove("_admin");
            obj.remove("_id");
            obj.insert("id".to_string(), json!(nsd_ro_id));
            obj.insert("osm_id".to_string(), json!(nsd_ro_id));
            if let Some(cs) = obj.get_mut("constituent-vnfd").and_then(Value::as_array_mut) {
                for c in cs.iter_mut() {
                    let Some(vref) = c.get("vnfd-id-ref").and_then(Value::as_str).map(str::to_string) else {
                        continue;
                    };
                    if let Some(ro_id) = vnfd_ro_ids.get(&vref) {
                        if let Some(co) = c.as_object_mut() {
                            co.insert("vnfd-id-ref".to_string(), json!(ro_id));
                        }
                    }
                }
            }
        }
        let created = ctx.ro.create("nsd", nsd_payload).await.map_err(|e| (step.clone(), e.into()))?;
        created.get("uuid").and_then(Value::as_str).unwrap_or_default().to_string()
    };
    ctx.db
        .set_one(NSRS, nsr_id, "_admin.deployed.RO.nsd_id", json!(ro_nsd_id.clone()))
        .await
        .map_err(|e| (step, e.into()))?;

    // 4. Create/recover NS at RO.
    let step = "creating ns at RO".to_string();
    let existing_nsr_ro_id = nsr_doc
        .pointer("/_admin/deployed/RO/nsr_id")
        .and_then(Value::as_str)
        .map(str::to_string);
    let mut ro_ns_id = None;
    if let Some(id) = existing_nsr_ro_id {
        match ctx.ro.show("ns", &id).await {
            Ok(desc) => {
                let (state, _) = ctx.ro.check_ns_status(&desc);
                if state == NsRoState::Error {
                    let _ = ctx.ro.delete("ns", &id).await;
                } else {
                    ro_ns_id = Some(id);
                }
            }
            Err(RoError::NotFound) => {}
            Err(e) => return Err((step, e.into())),
        }
    }
    if ro_ns_id.is_none() {
        let instantiate_params = nsr_doc.get("instantiate_params").cloned().unwrap_or(Value::Null);
        let ro_params = ns_params_2_ro(ctx.db.as_ref(), &instantiate_params)
            .await
            .map_err(|e| (step.clone(), e))?;
        let mut payload = ro_params.unwrap_or_else(|| json!({}));
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("name".to_string(), nsr_doc.get("name").cloned().unwrap_or(json!(nsr_id)));
            obj.insert("scenario".to_string(), json!(ro_nsd_id));
        }
        let created = ctx.ro.create("ns", payload).await.map_err(|e| (step.clone(), e.into()))?;
        ctx.db
            .set_one(NSRS, nsr_id, "_admin.deployed.RO.nsr_status", json!("BUILD"))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
        ro_ns_id = created.get("uuid").and_then(Value::as_str).map(str::to_string);
    }
    let ro_ns_id = ro_ns_id.ok_or_else(|| (step.clone(), LcmError::Validation("RO create(\"ns\") returned no uuid".to_string())))?;
    ctx.db
        .set_one(NSRS, nsr_id, "_admin.deployed.RO.nsr_id", json!(ro_ns_id.clone()))
        .await
        .map_err(|e| (step, e.into()))?;

    // 5. Backfill VNFR vim-account-id.
    let step = "backfilling vnfr vim-account-id".to_string();
    let instantiate_params = nsr_doc.get("instantiate_params").cloned().unwrap_or(Value::Null);
    let top_vim = instantiate_params.get("vimAccountId").and_then(Value::as_str).map(str::to_string);
    for (_, idx) in &constituents {
        let doc_id = vnfr_doc_id(nsr_id, idx);
        let vnfr_doc = ctx.db.get_one(VNFRS, &doc_id).await.map_err(|e| (step.clone(), e.into()))?;
        if vnfr_doc.get("vim-account-id").and_then(Value::as_str).is_some() {
            continue;
        }
        let per_vnf = instantiate_params
            .pointer("/vnf")
            .and_then(Value::as_array)
            .and_then(|vnfs| vnfs.iter().find(|v| v.get("member-vnf-index").and_then(Value::as_str) == Some(idx.as_str())))
            .and_then(|v| v.get("vimAccountId"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let Some(vim_id) = per_vnf.or_else(|| top_vim.clone()) else {
            continue;
        };
        ctx.db
            .set_one(VNFRS, &doc_id, "vim-account-id", json!(vim_id))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
    }

    // 6. Poll for ACTIVE.
    let step = "waiting for ns to become active".to_string();
    let deadline = ctx.clock.now() + chrono::Duration::seconds(7200);
    let mut last_detail = String::new();
    let nsr_ip: HashMap<String, VnfInfo> = loop {
        if token.is_cancelled() {
            return Err((step, LcmError::Validation("cancelled".to_string())));
        }
        if ctx.clock.now() > deadline {
            return Err((step, LcmError::Timeout("Timeout waiting ns to be ready".to_string())));
        }
        let desc = ctx.ro.show("ns", &ro_ns_id).await.map_err(|e| (step.clone(), e.into()))?;
        let (state, info) = ctx.ro.check_ns_status(&desc);
        match state {
            NsRoState::Error => return Err((step, LcmError::Validation(info))),
            NsRoState::Build => {
                if info != last_detail {
                    ctx.db
                        .set_one(NSRS, nsr_id, "detailed-status", json!(info.clone()))
                        .await
                        .map_err(|e| (step.clone(), e.into()))?;
                    last_detail = info;
                }
                tokio::select! {
                    _ = tokio::time::sleep(std::time::Duration::from_secs(5)) => {}
                    _ = token.cancelled() => return Err((step, LcmError::Validation("cancelled".to_string()))),
                }
            }
            NsRoState::Active => match ctx.ro.get_ns_vnf_info(&desc).await {
                Ok(map) => break map,
                Err(RoError::Conflict) => {
                    tokio::select! {
                        _ = tokio::time::sleep(std::time::Duration::from_secs(5)) => {}
                        _ = token.cancelled() => return Err((step, LcmError::Validation("cancelled".to_string()))),
                    }
                }
                Err(e) => return Err((step, e.into())),
            },
        }
    };
    ctx.db
        .set_one(NSRS, nsr_id, "_admin.deployed.RO.nsr_status", json!("ACTIVE"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    for (idx, info) in &nsr_ip {
        let info_value = serde_json::to_value(info).unwrap_or(Value::Null);
        ctx.db
            .set_one(NSRS, nsr_id, &format!("_admin.deployed.nsr_ip.{idx}"), info_value)
            .await
            .map_err(|e| (step.clone(), e.into()))?;
    }

    // 7. Enrich VNFRs.
    let step = "enriching vnfrs with ip info".to_string();
    for (_, idx) in &constituents {
        let Some(info) = nsr_ip.get(idx) else { continue };
        let doc_id = vnfr_doc_id(nsr_id, idx);
        let mut vnfr_doc = ctx.db.get_one(VNFRS, &doc_id).await.map_err(|e| (step.clone(), e.into()))?;
        if let Some(obj) = vnfr_doc.as_object_mut() {
            if let Some(ip) = &info.ip_address {
                obj.insert("ip-address".to_string(), json!(ip));
            }
            if let Some(vdur) = obj.get_mut("vdur").and_then(Value::as_array_mut) {
                for v in vdur.iter_mut() {
                    let Some(vdu_id_ref) = v.get("vdu-id-ref").and_then(Value::as_str).map(str::to_string) else {
                        continue;
                    };
                    let Some(vdu_info) = info.vdur.get(&vdu_id_ref) else { continue };
                    if let Some(vo) = v.as_object_mut() {
                        if let Some(vim_id) = &vdu_info.vim_id {
                            vo.insert("vim-id".to_string(), json!(vim_id));
                        }
                        if let Some(ip) = &vdu_info.ip_address {
                            vo.insert("ip-address".to_string(), json!(ip));
                        }
                    }
                }
            }
        }
        ctx.db.replace(VNFRS, &doc_id, vnfr_doc).await.map_err(|e| (step.clone(), e.into()))?;
    }

    // 8. VCA deploy fan-out.
    let step = "dispatching VCA deploys".to_string();
    let nsr_name = nsr_doc.get("name").and_then(Value::as_str).unwrap_or(nsr_id).to_string();
    let mut dispatched = 0usize;
    for (vnfd_id, idx) in &constituents {
        let vnfd_doc = ctx.db.get_one(VNFDS, vnfd_id).await.map_err(|e| (step.clone(), e.into()))?;
        let vnfd: Vnfd = serde_json::from_value(vnfd_doc)
            .map_err(|e| (step.clone(), LcmError::Validation(format!("vnfd {vnfd_id} did not parse: {e}"))))?;
        let charms: Vec<_> = vnfd.charms().into_iter().cloned().collect();
        if charms.is_empty() {
            continue;
        }
        if dispatched == 0 {
            ctx.vca.login().await.map_err(|e| (step.clone(), e.into()))?;
        }

        let doc_id = vnfr_doc_id(nsr_id, idx);
        let vnfr_doc = ctx.db.get_one(VNFRS, &doc_id).await.map_err(|e| (step.clone(), e.into()))?;
        let rw_mgmt_ip = vnfr_doc.get("ip-address").and_then(Value::as_str).map(str::to_string);
        let application = ctx.vca.format_application_name(&nsr_name, idx, &vnfd.name);

        ctx.db
            .set_one(
                NSRS,
                nsr_id,
                &format!("_admin.deployed.VCA.{idx}"),
                json!({
                    "model": "default",
                    "application": application,
                    "vnfd_id": vnfd_id,
                    "operational-status": "init",
                    "detailed-status": "",
                }),
            )
            .await
            .map_err(|e| (step.clone(), e.into()))?;

        for charm in &charms {
            let charm_path = format!("{}/{storage_folder}/{storage_pkg_dir}/charms/{}", ctx.fs.get_params().path, charm.charm);
            let mut params = serde_json::Map::new();
            if let Some(ip) = &rw_mgmt_ip {
                params.insert("rw_mgmt_ip".to_string(), json!(ip));
            }
            if !charm.initial_config_primitive.is_empty() {
                params.insert("initial-config-primitive".to_string(), json!(charm.initial_config_primitive));
            }

            let ctx2 = Arc::clone(ctx);
            let nsr_id_owned = nsr_id.to_string();
            let nslcmop_id_owned = nslcmop_id.to_string();
            let idx_owned = idx.clone();
            let application_owned = application.clone();
            let vnfd_owned = vnfd.clone();

            ctx.spawn_supervised(Topic::Ns, nsr_id, order_id, &format!("create_charm:{idx}"), async move {
                let outcome = ctx2
                    .vca
                    .deploy_charms("default", &application_owned, &vnfd_owned, &charm_path, Value::Object(params))
                    .await
                    .map_err(|e| e.to_string());
                task_completed(&ctx2, &nsr_id_owned, &nslcmop_id_owned, &idx_owned, TaskKind::Instantiate, false, outcome).await;
            });
            dispatched += 1;
        }
    }

    // 9. Record outcome.
    let step = "recording outcome".to_string();
    ctx.db
        .set_one(NSRS, nsr_id, "_admin.nsState", json!("INSTANTIATED"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    if dispatched > 0 {
        ctx.db
            .set_one(NSRS, nsr_id, "config-status", json!("configuring"))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
        ctx.db
            .set_one(NSLCMOPS, nslcmop_id, "detailed-status", json!(format!("configuring: init: {dispatched}")))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
    } else {
        ctx.db
            .set_one(NSLCMOPS, nslcmop_id, "operationState", json!("COMPLETED"))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
        ctx.db
            .set_one(NSLCMOPS, nslcmop_id, "detailed-status", json!("Done"))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
        ctx.db
            .set_one(NSRS, nsr_id, "config-status", json!("configured"))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
    }
    ctx.db
        .set_one(NSRS, nsr_id, "operational-status", json!("running"))
        .await
        .map_err(|e| (step, e.into()))?;
    Ok(())
}

#[cfg(test)]
#[path = "ns_instantiate_tests.rs"]
mod tests;
