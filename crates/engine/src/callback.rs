// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The VCA callback aggregator. Receives per-VNF status pushes and deploy/remove task
//! completions, folds them into the NS-wide `config-status`, and records action outcomes.
//! Only `(nsr_id, nslcmop_id)` cross the callback boundary — every write re-fetches and
//! patches a single dotted field, so a status push interleaved with a workflow write can never
//! produce a torn document.

use crate::context::LcmContext;
use serde_json::{json, Value};
use std::collections::BTreeMap;

const NSRS: &str = "nsrs";
const NSLCMOPS: &str = "nslcmops";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Instantiate,
    Terminate,
    Action,
}

/// VCA pushed a status update for `vnf_index` outside of any task completion.
pub async fn status_push(
    ctx: &LcmContext,
    nsr_id: &str,
    nslcmop_id: &str,
    vnf_index: &str,
    status: &str,
    detailed_status: &str,
) {
    let Ok(doc) = ctx.db.get_one(NSRS, nsr_id).await else {
        return;
    };
    let current = doc
        .pointer(&format!("/_admin/deployed/VCA/{vnf_index}/operational-status"))
        .and_then(Value::as_str);
    if current == Some(status) {
        return;
    }
    if let Err(e) = ctx
        .db
        .set_one(NSRS, nsr_id, &format!("_admin.deployed.VCA.{vnf_index}.operational-status"), json!(status))
        .await
    {
        tracing::warn!(nsr_id, error = %e, "failed to record VCA status push");
        return;
    }
    let _ = ctx
        .db
        .set_one(NSRS, nsr_id, &format!("_admin.deployed.VCA.{vnf_index}.detailed-status"), json!(detailed_status))
        .await;
    aggregate(ctx, nsr_id, nslcmop_id).await;
}

/// A supervised VCA task finished. `cancelled` short-circuits with no DB write — a cancelled
/// task observed here must never leave a trace that could race a workflow that has already
/// moved on. `outcome` carries the stringified error, if any (errors cross this boundary as
/// `String` because `VcaError` doesn't need to survive past logging here).
pub async fn task_completed(
    ctx: &LcmContext,
    nsr_id: &str,
    nslcmop_id: &str,
    vnf_index: &str,
    kind: TaskKind,
    cancelled: bool,
    outcome: Result<(), String>,
) {
    if kind == TaskKind::Action {
        let now = ctx.clock.now();
        let (state, detail) = match outcome {
            Ok(()) => ("COMPLETED", "Done".to_string()),
            Err(e) => ("FAILED", e),
        };
        let _ = ctx.db.set_one(NSLCMOPS, nslcmop_id, "operationState", json!(state)).await;
        let _ = ctx.db.set_one(NSLCMOPS, nslcmop_id, "detailed-status", json!(detail)).await;
        let _ = ctx
            .db
            .set_one(NSLCMOPS, nslcmop_id, "statusEnteredTime", json!(now.to_rfc3339()))
            .await;
        return;
    }

    if cancelled {
        tracing::info!(nsr_id, vnf_index, "vca task cancelled, skipping callback");
        return;
    }

    match outcome {
        // A successful instantiate/terminate completion doesn't aggregate by itself — the
        // charm's own status pushes (init -> ... -> active) drive that.
        Ok(()) => {}
        Err(e) => {
            let _ = ctx
                .db
                .set_one(NSRS, nsr_id, &format!("_admin.deployed.VCA.{vnf_index}.operational-status"), json!("error"))
                .await;
            let _ = ctx
                .db
                .set_one(NSRS, nsr_id, &format!("_admin.deployed.VCA.{vnf_index}.detailed-status"), json!(e))
                .await;
            aggregate(ctx, nsr_id, nslcmop_id).await;
        }
    }
}

async fn aggregate(ctx: &LcmContext, nsr_id: &str, nslcmop_id: &str) {
    let Ok(doc) = ctx.db.get_one(NSRS, nsr_id).await else {
        return;
    };
    let Some(vca) = doc.pointer("/_admin/deployed/VCA").and_then(Value::as_object) else {
        return;
    };
    if vca.is_empty() {
        return;
    }

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut errors = Vec::new();
    for entry in vca.values() {
        let status = entry
            .get("operational-status")
            .and_then(Value::as_str)
            .unwrap_or("init")
            .to_string();
        if status == "error" || status == "blocked" {
            if let Some(detail) = entry.get("detailed-status").and_then(Value::as_str) {
                if !detail.is_empty() {
                    errors.push(detail.to_string());
                }
            }
        }
        *counts.entry(status).or_default() += 1;
    }

    let total = vca.len();
    let all_active = counts.get("active").copied().unwrap_or(0) == total;
    let any_bad = counts.get("error").copied().unwrap_or(0) > 0 || counts.get("blocked").copied().unwrap_or(0) > 0;

    let (config_status, detailed, op_state) = if all_active {
        ("configured".to_string(), "done".to_string(), Some("COMPLETED"))
    } else if any_bad {
        (
            "failed".to_string(),
            format!("fail configuring {}", errors.join(";")),
            Some("FAILED_TEMP"),
        )
    } else {
        let summary = counts
            .iter()
            .map(|(status, n)| format!("{status}: {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        (format!("configuring: {summary}"), format!("configuring: {summary}"), None)
    };

    let _ = ctx.db.set_one(NSRS, nsr_id, "config-status", json!(config_status)).await;
    let _ = ctx.db.set_one(NSRS, nsr_id, "detailed-status", json!(detailed)).await;
    if let Some(op_state) = op_state {
        let _ = ctx.db.set_one(NSLCMOPS, nslcmop_id, "operationState", json!(op_state)).await;
        let now = ctx.clock.now();
        let _ = ctx
            .db
            .set_one(NSLCMOPS, nslcmop_id, "statusEnteredTime", json!(now.to_rfc3339()))
            .await;
    }
}

#[cfg(test)]
#[path = "callback_tests.rs"]
mod tests;
