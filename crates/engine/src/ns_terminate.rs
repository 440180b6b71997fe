// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The NS terminate workflow: drains deployed charms, removes RO artifacts in dependency
//! order, and selects the operation's final outcome from whatever went wrong along the way.

use crate::context::LcmContext;
use crate::error::LcmError;
use crate::registry::{TaskHandle, Topic};
use lcm_adapters::RoError;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

const NSRS: &str = "nsrs";
const NSLCMOPS: &str = "nslcmops";
const VNFRS: &str = "vnfrs";

const VCA_DRAIN_DEADLINE: Duration = Duration::from_secs(300);

pub async fn ns_terminate(ctx: &Arc<LcmContext>, nsr_id: &str, nslcmop_id: &str, order_id: u64) -> Result<(), LcmError> {
    match run(ctx, nsr_id, nslcmop_id, order_id).await {
        Ok(()) => Ok(()),
        Err((step, err)) => {
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

async fn run(ctx: &Arc<LcmContext>, nsr_id: &str, nslcmop_id: &str, order_id: u64) -> Result<(), (String, LcmError)> {
    let step = "loading ns record".to_string();
    let nsr_doc = ctx.db.get_one(NSRS, nsr_id).await.map_err(|e| (step, e.into()))?;

    if nsr_doc.pointer("/_admin/nsState").and_then(Value::as_str) == Some("NOT_INSTANTIATED") {
        return Ok(());
    }

    let step = "marking ns as terminating".to_string();
    ctx.db
        .set_one(NSRS, nsr_id, "operational-status", json!("terminating"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(NSRS, nsr_id, "config-status", json!("terminating"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(NSRS, nsr_id, "detailed-status", json!("Deleting charms"))
        .await
        .map_err(|e| (step, e.into()))?;

    let vca_entries: Vec<(String, String, String)> = nsr_doc
        .pointer("/_admin/deployed/VCA")
        .and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .filter_map(|(idx, v)| {
                    let model = v.get("model")?.as_str()?.to_string();
                    let application = v.get("application")?.as_str()?.to_string();
                    Some((idx.clone(), model, application))
                })
                .collect()
        })
        .unwrap_or_default();

    let mut failed_details: Vec<String> = Vec::new();

    // Drain deployed charms, each as a cancellable, registry-tracked task.
    let mut set: JoinSet<(String, Result<(), String>)> = JoinSet::new();
    let mut tokens: HashMap<String, CancellationToken> = HashMap::new();
    for (idx, model, application) in &vca_entries {
        let handle = TaskHandle::new();
        let token = handle.token.clone();
        ctx.registry
            .register(Topic::Ns, nsr_id, order_id, &format!("remove_charm:{idx}"), handle);
        tokens.insert(idx.clone(), token.clone());

        let ctx2 = Arc::clone(ctx);
        let idx2 = idx.clone();
        let model2 = model.clone();
        let application2 = application.clone();
        set.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => (idx2, Err("Task has been cancelled".to_string())),
                res = ctx2.vca.remove_charms(&model2, &application2) => (idx2, res.map_err(|e| e.to_string())),
            }
        });
    }

    let mut finished: HashSet<String> = HashSet::new();
    let mut removed_vca: Vec<String> = Vec::new();
    let deadline = tokio::time::Instant::now() + VCA_DRAIN_DEADLINE;
    while !set.is_empty() {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {
                for (idx, token) in &tokens {
                    if !finished.contains(idx) {
                        token.cancel();
                        failed_details.push(format!("{idx}: timeout removing charms"));
                    }
                }
                set.abort_all();
                break;
            }
            joined = set.join_next() => {
                match joined {
                    Some(Ok((idx, Ok(())))) => {
                        finished.insert(idx.clone());
                        removed_vca.push(idx);
                    }
                    Some(Ok((idx, Err(e)))) => {
                        finished.insert(idx.clone());
                        failed_details.push(format!("{idx}: {e}"));
                    }
                    Some(Err(join_err)) => {
                        failed_details.push(format!("remove_charm task panicked: {join_err}"));
                    }
                    None => break,
                }
            }
        }
    }
    for idx in &removed_vca {
        let _ = ctx
            .db
            .set_one(NSRS, nsr_id, &format!("_admin.deployed.VCA.{idx}"), Value::Null)
            .await;
    }

    // Delete RO artifacts: NS, NSD, each VNFD. 404 is success; 409 and other errors are
    // recorded as failed-detail but never stop cleanup of the remaining artifacts.
    let deployed_ro = nsr_doc.pointer("/_admin/deployed/RO").cloned().unwrap_or(Value::Null);

    if let Some(ro_ns_id) = deployed_ro.get("nsr_id").and_then(Value::as_str) {
        match ctx.ro.delete("ns", ro_ns_id).await {
            Ok(()) | Err(RoError::NotFound) => {
                let _ = ctx.db.set_one(NSRS, nsr_id, "_admin.deployed.RO.nsr_id", Value::Null).await;
            }
            Err(RoError::Conflict) => failed_details.push(format!("ns {ro_ns_id}: RO reported a conflict deleting it")),
            Err(e) => failed_details.push(format!("ns {ro_ns_id}: {e}")),
        }
    }

    if let Some(ro_nsd_id) = deployed_ro.get("nsd_id").and_then(Value::as_str) {
        match ctx.ro.delete("nsd", ro_nsd_id).await {
            Ok(()) | Err(RoError::NotFound) => {
                let _ = ctx.db.set_one(NSRS, nsr_id, "_admin.deployed.RO.nsd_id", Value::Null).await;
            }
            Err(RoError::Conflict) => failed_details.push(format!("nsd {ro_nsd_id}: RO reported a conflict deleting it")),
            Err(e) => failed_details.push(format!("nsd {ro_nsd_id}: {e}")),
        }
    }

    if let Some(vnfd_ids) = deployed_ro.get("vnfd_id").and_then(Value::as_object) {
        for (vnfd_id, ro_id) in vnfd_ids {
            let Some(ro_id) = ro_id.as_str() else { continue };
            match ctx.ro.delete("vnfd", ro_id).await {
                Ok(()) | Err(RoError::NotFound) => {
                    let _ = ctx
                        .db
                        .set_one(NSRS, nsr_id, &format!("_admin.deployed.RO.vnfd_id.{vnfd_id}"), Value::Null)
                        .await;
                }
                Err(RoError::Conflict) => failed_details.push(format!("vnfd {vnfd_id}: RO reported a conflict deleting it")),
                Err(e) => failed_details.push(format!("vnfd {vnfd_id}: {e}")),
            }
        }
    }

    let now = ctx.clock.now();
    let nslcmop_doc = ctx.db.get_one(NSLCMOPS, nslcmop_id).await.ok();
    let autoremove = nslcmop_doc
        .as_ref()
        .and_then(|d| d.pointer("/operationParams/autoremove"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !failed_details.is_empty() {
        let step = "recording deletion errors".to_string();
        ctx.db
            .set_one(NSRS, nsr_id, "detailed-status", json!(format!("Deletion errors {}", failed_details.join("; "))))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
        ctx.db
            .set_one(NSRS, nsr_id, "operational-status", json!("failed"))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
        ctx.db
            .set_one(NSLCMOPS, nslcmop_id, "operationState", json!("FAILED"))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
        ctx.db
            .set_one(NSLCMOPS, nslcmop_id, "detailed-status", json!(format!("Deletion errors {}", failed_details.join("; "))))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
        ctx.db
            .set_one(NSLCMOPS, nslcmop_id, "statusEnteredTime", json!(now.to_rfc3339()))
            .await
            .map_err(|e| (step, e.into()))?;
        return Ok(());
    }

    if autoremove {
        let step = "autoremoving ns records".to_string();
        ctx.db.del_one(NSRS, nsr_id).await.map_err(|e| (step.clone(), e.into()))?;
        ctx.db
            .del_list(NSLCMOPS, json!({"nsInstanceId": nsr_id}))
            .await
            .map_err(|e| (step.clone(), e.into()))?;
        ctx.db
            .del_list(VNFRS, json!({"nsr-id-ref": nsr_id}))
            .await
            .map_err(|e| (step, e.into()))?;
        return Ok(());
    }

    let step = "recording successful termination".to_string();
    ctx.db
        .set_one(NSRS, nsr_id, "operational-status", json!("terminated"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(NSRS, nsr_id, "detailed-status", json!("Done"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(NSRS, nsr_id, "_admin.nsState", json!("NOT_INSTANTIATED"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(NSLCMOPS, nslcmop_id, "operationState", json!("COMPLETED"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(NSLCMOPS, nslcmop_id, "detailed-status", json!("Done"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(NSLCMOPS, nslcmop_id, "statusEnteredTime", json!(now.to_rfc3339()))
        .await
        .map_err(|e| (step, e.into()))?;
    Ok(())
}

#[cfg(test)]
#[path = "ns_terminate_tests.rs"]
mod tests;
