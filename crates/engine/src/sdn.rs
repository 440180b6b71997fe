// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SDN controller CRUD workflows: the same shape as the VIM workflows against the `sdns`
//! collection and RO's `sdn` resource, minus the datacenter attach/detach step.

use crate::context::LcmContext;
use crate::error::LcmError;
use serde_json::{json, Value};

const COLLECTION: &str = "sdns";

async fn record_error(ctx: &LcmContext, id: &str, step: &str, err: &LcmError) {
    let detail = format!("ERROR {step}: {err}");
    if let Err(e) = ctx
        .db
        .set_one(COLLECTION, id, "_admin.operationalState", json!("ERROR"))
        .await
    {
        tracing::warn!(%id, error = %e, "failed to record ERROR operationalState");
    }
    if let Err(e) = ctx
        .db
        .set_one(COLLECTION, id, "_admin.detailed-status", json!(detail))
        .await
    {
        tracing::warn!(%id, error = %e, "failed to record ERROR detailed-status");
    }
}

fn build_ro_sdn_payload(doc: &Value) -> Value {
    let mut payload = doc.as_object().cloned().unwrap_or_default();
    payload.remove("_id");
    payload.remove("_admin");
    Value::Object(payload)
}

pub async fn sdn_create(ctx: &LcmContext, sdn_id: &str) -> Result<(), LcmError> {
    match run_create(ctx, sdn_id).await {
        Ok(()) => Ok(()),
        Err((step, err)) => {
            record_error(ctx, sdn_id, &step, &err).await;
            Err(err)
        }
    }
}

async fn run_create(ctx: &LcmContext, sdn_id: &str) -> Result<(), (String, LcmError)> {
    let step = "loading sdn".to_string();
    let doc = ctx
        .db
        .get_one(COLLECTION, sdn_id)
        .await
        .map_err(|e| (step.clone(), e.into()))?;

    ctx.db
        .set_one(COLLECTION, sdn_id, "_admin.deployed.RO", Value::Null)
        .await
        .map_err(|e| (step.clone(), e.into()))?;

    let step = "creating sdn at RO".to_string();
    let created = ctx
        .ro
        .create("sdn", build_ro_sdn_payload(&doc))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    let ro_id = created
        .get("uuid")
        .and_then(Value::as_str)
        .ok_or_else(|| (step.clone(), LcmError::Validation("RO create(\"sdn\") returned no uuid".to_string())))?
        .to_string();

    ctx.db
        .set_one(COLLECTION, sdn_id, "_admin.deployed.RO", json!(ro_id))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(COLLECTION, sdn_id, "_admin.operationalState", json!("ENABLED"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(COLLECTION, sdn_id, "_admin.detailed-status", json!("Done"))
        .await
        .map_err(|e| (step, e.into()))?;
    Ok(())
}

pub async fn sdn_edit(ctx: &LcmContext, sdn_id: &str) -> Result<(), LcmError> {
    match run_edit(ctx, sdn_id).await {
        Ok(()) => Ok(()),
        Err((step, err)) => {
            record_error(ctx, sdn_id, &step, &err).await;
            Err(err)
        }
    }
}

async fn run_edit(ctx: &LcmContext, sdn_id: &str) -> Result<(), (String, LcmError)> {
    let step = "loading sdn".to_string();
    let doc = ctx
        .db
        .get_one(COLLECTION, sdn_id)
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    let ro_id = doc
        .pointer("/_admin/deployed/RO")
        .and_then(Value::as_str)
        .ok_or_else(|| (step.clone(), LcmError::Validation(format!("sdn {sdn_id} has no RO id to edit"))))?
        .to_string();

    let step = "editing sdn at RO".to_string();
    ctx.ro
        .edit("sdn", &ro_id, build_ro_sdn_payload(&doc))
        .await
        .map_err(|e| (step.clone(), e.into()))?;

    ctx.db
        .set_one(COLLECTION, sdn_id, "_admin.detailed-status", json!("Done"))
        .await
        .map_err(|e| (step, e.into()))?;
    Ok(())
}

pub async fn sdn_delete(ctx: &LcmContext, sdn_id: &str) -> Result<(), LcmError> {
    match run_delete(ctx, sdn_id).await {
        Ok(()) => Ok(()),
        Err((step, err)) => {
            record_error(ctx, sdn_id, &step, &err).await;
            Err(err)
        }
    }
}

async fn run_delete(ctx: &LcmContext, sdn_id: &str) -> Result<(), (String, LcmError)> {
    let step = "loading sdn".to_string();
    let doc = ctx
        .db
        .get_one(COLLECTION, sdn_id)
        .await
        .map_err(|e| (step, e.into()))?;

    if let Some(ro_id) = doc.pointer("/_admin/deployed/RO").and_then(Value::as_str) {
        let step = "deleting sdn at RO".to_string();
        match ctx.ro.delete("sdn", ro_id).await {
            Ok(()) => {}
            Err(lcm_adapters::RoError::NotFound) => {
                tracing::info!(sdn_id, ro_id, "sdn already gone at RO");
            }
            Err(e) => return Err((step, e.into())),
        }
    }

    ctx.db
        .del_one(COLLECTION, sdn_id)
        .await
        .map_err(|e| ("removing sdn row".to_string(), e.into()))?;
    Ok(())
}

#[cfg(test)]
#[path = "sdn_tests.rs"]
mod tests;
