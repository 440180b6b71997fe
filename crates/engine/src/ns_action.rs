// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The NS action workflow: validates a deployed VCA unit is reachable, dispatches a charm
//! primitive against it as a cancellable task, and maps the outcome to the operation record.

use crate::context::LcmContext;
use crate::error::LcmError;
use crate::registry::{TaskHandle, Topic};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const NSRS: &str = "nsrs";
const NSLCMOPS: &str = "nslcmops";

const ACTION_DEADLINE: Duration = Duration::from_secs(300);

pub async fn ns_action(ctx: &Arc<LcmContext>, nsr_id: &str, nslcmop_id: &str, order_id: u64) -> Result<(), LcmError> {
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

async fn outcome(
    ctx: &LcmContext,
    nslcmop_id: &str,
    detailed_status: &str,
    operation_state: &str,
) -> Result<(), (String, LcmError)> {
    let step = "recording action outcome".to_string();
    let now = ctx.clock.now();
    ctx.db
        .set_one(NSLCMOPS, nslcmop_id, "detailed-status", json!(detailed_status))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(NSLCMOPS, nslcmop_id, "operationState", json!(operation_state))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(NSLCMOPS, nslcmop_id, "statusEnteredTime", json!(now.to_rfc3339()))
        .await
        .map_err(|e| (step, e.into()))?;
    Ok(())
}

async fn run(ctx: &Arc<LcmContext>, nsr_id: &str, nslcmop_id: &str, order_id: u64) -> Result<(), (String, LcmError)> {
    let step = "loading action parameters".to_string();
    let nslcmop_doc = ctx.db.get_one(NSLCMOPS, nslcmop_id).await.map_err(|e| (step, e.into()))?;

    let params = nslcmop_doc.pointer("/operationParams").cloned().unwrap_or(Value::Null);
    let vnf_index = params
        .get("member_vnf_index")
        .and_then(Value::as_str)
        .ok_or_else(|| ("validating action parameters".to_string(), LcmError::Validation("member_vnf_index is required".to_string())))?
        .to_string();
    let primitive = params
        .get("primitive")
        .and_then(Value::as_str)
        .ok_or_else(|| ("validating action parameters".to_string(), LcmError::Validation("primitive is required".to_string())))?
        .to_string();
    let primitive_params = params.get("primitive_params").cloned().unwrap_or_else(|| json!({}));

    let step = "loading ns record".to_string();
    let nsr_doc = ctx.db.get_one(NSRS, nsr_id).await.map_err(|e| (step, e.into()))?;

    let vca_entry = nsr_doc.pointer(&format!("/_admin/deployed/VCA/{vnf_index}"));
    let model = vca_entry.and_then(|v| v.get("model")).and_then(Value::as_str).unwrap_or_default();
    let application = vca_entry.and_then(|v| v.get("application")).and_then(Value::as_str).unwrap_or_default();
    let operational_status = vca_entry
        .and_then(|v| v.get("operational-status"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    if model.is_empty() || application.is_empty() || operational_status != "active" {
        let step = "validating vca unit".to_string();
        let err = LcmError::Validation(format!(
            "VNF '{vnf_index}' VCA unit is not 'active' (state: '{operational_status}')"
        ));
        return Err((step, err));
    }

    let handle = TaskHandle::new();
    let own_token = handle.token.clone();
    let task_token = handle.token.clone();
    ctx.registry
        .register(Topic::Ns, nsr_id, order_id, &format!("action:{vnf_index}"), handle);

    let ctx2 = Arc::clone(ctx);
    let model2 = model.to_string();
    let application2 = application.to_string();
    let primitive2 = primitive.clone();
    let mut join = tokio::spawn(async move {
        tokio::select! {
            _ = task_token.cancelled() => Err("cancelled".to_string()),
            res = ctx2.vca.execute_primitive(&model2, &application2, &primitive2, primitive_params) => {
                res.map_err(|e| e.to_string())
            }
        }
    });

    let deadline = tokio::time::Instant::now() + ACTION_DEADLINE;
    tokio::select! {
        _ = tokio::time::sleep_until(deadline) => {
            own_token.cancel();
            join.abort();
            outcome(ctx, nslcmop_id, "timeout", "FAILED").await?;
        }
        joined = &mut join => {
            match joined {
                Ok(Err(reason)) if reason == "cancelled" => {
                    outcome(ctx, nslcmop_id, "Task has been cancelled", "FAILED").await?;
                }
                Ok(Err(reason)) => {
                    outcome(ctx, nslcmop_id, &reason, "FAILED").await?;
                }
                Ok(Ok(())) => {
                    outcome(ctx, nslcmop_id, "Done", "COMPLETED").await?;
                }
                Err(join_err) => {
                    outcome(ctx, nslcmop_id, &format!("{join_err}"), "FAILED").await?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "ns_action_tests.rs"]
mod tests;
