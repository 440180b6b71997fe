// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! VIM account CRUD workflows: reconcile a `vim_accounts` row against the RO `vim`/`vim_account`
//! resources. All three verbs share the step-tracked error trail described in `record_error`.

use crate::context::LcmContext;
use crate::error::LcmError;
use serde_json::{json, Value};

const COLLECTION: &str = "vim_accounts";

/// Writes `{operationalState: ERROR, detailed-status: "ERROR {step}: {err}"}`. Best-effort: a
/// failure to write the error trail itself is logged and swallowed, never replacing the
/// original error the caller is about to return.
async fn record_error(ctx: &LcmContext, collection: &str, id: &str, step: &str, err: &LcmError) {
    let detail = format!("ERROR {step}: {err}");
    if let Err(e) = ctx
        .db
        .set_one(collection, id, "_admin.operationalState", json!("ERROR"))
        .await
    {
        tracing::warn!(%id, error = %e, "failed to record ERROR operationalState");
    }
    if let Err(e) = ctx
        .db
        .set_one(collection, id, "_admin.detailed-status", json!(detail))
        .await
    {
        tracing::warn!(%id, error = %e, "failed to record ERROR detailed-status");
    }
}

/// Drops the fields RO never sees and renames `vim_type` to the `type` key RO's `vim` resource
/// expects, injecting the resolved SDN RO-id when the account references one.
fn build_ro_vim_payload(doc: &Value, sdn_ro_id: Option<&str>) -> Value {
    let mut payload = doc.as_object().cloned().unwrap_or_default();
    for key in ["_id", "_admin", "schema_version", "schema_type", "vim_tenant_name", "vim_user", "vim_password"] {
        payload.remove(key);
    }
    if let Some(vim_type) = payload.remove("vim_type") {
        payload.insert("type".to_string(), vim_type);
    }
    if let Some(config) = payload.get_mut("config").and_then(Value::as_object_mut) {
        config.remove("sdn-controller");
        if config.is_empty() {
            payload.remove("config");
        }
    }
    if let Some(sdn_ro_id) = sdn_ro_id {
        payload.insert("sdn-controller".to_string(), json!(sdn_ro_id));
    }
    Value::Object(payload)
}

/// Builds the `{vim_tenant_name, vim_username, vim_password, config?}` body `attach_datacenter`
/// and the `vim_account` RO resource expect, stripped of anything SDN-related.
fn build_vim_account_payload(doc: &Value) -> Value {
    let mut payload = serde_json::Map::new();
    if let Some(v) = doc.get("vim_tenant_name") {
        payload.insert("vim_tenant_name".to_string(), v.clone());
    }
    if let Some(v) = doc.get("vim_user") {
        payload.insert("vim_username".to_string(), v.clone());
    }
    if let Some(v) = doc.get("vim_password") {
        payload.insert("vim_password".to_string(), v.clone());
    }
    if let Some(config) = doc.get("config").and_then(Value::as_object) {
        let mut config = config.clone();
        config.remove("sdn-controller");
        if !config.is_empty() {
            payload.insert("config".to_string(), Value::Object(config));
        }
    }
    Value::Object(payload)
}

/// Resolves `config.sdn-controller` (if set) to its RO-assigned id, failing if the referenced
/// SDN has never been deployed at RO.
async fn resolve_sdn_ro_id(ctx: &LcmContext, doc: &Value) -> Result<Option<String>, (String, LcmError)> {
    let Some(sdn_id) = doc.pointer("/config/sdn-controller").and_then(Value::as_str) else {
        return Ok(None);
    };
    let step = format!("Getting sdn-controller-id={sdn_id}");
    let sdn_doc = ctx
        .db
        .get_one("sdns", sdn_id)
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    match sdn_doc.pointer("/_admin/deployed/RO").and_then(Value::as_str) {
        Some(ro_id) => Ok(Some(ro_id.to_string())),
        None => Err((
            step.clone(),
            LcmError::Validation(format!("sdn-controller-id={sdn_id} is not deployed at RO")),
        )),
    }
}

pub async fn vim_create(ctx: &LcmContext, vim_id: &str) -> Result<(), LcmError> {
    match run_create(ctx, vim_id).await {
        Ok(()) => Ok(()),
        Err((step, err)) => {
            record_error(ctx, COLLECTION, vim_id, &step, &err).await;
            Err(err)
        }
    }
}

async fn run_create(ctx: &LcmContext, vim_id: &str) -> Result<(), (String, LcmError)> {
    let step = "loading vim account".to_string();
    let doc = ctx
        .db
        .get_one(COLLECTION, vim_id)
        .await
        .map_err(|e| (step.clone(), e.into()))?;

    ctx.db
        .set_one(COLLECTION, vim_id, "_admin.deployed.RO", Value::Null)
        .await
        .map_err(|e| (step.clone(), e.into()))?;

    let sdn_ro_id = resolve_sdn_ro_id(ctx, &doc).await?;

    let step = "creating vim at RO".to_string();
    let ro_payload = build_ro_vim_payload(&doc, sdn_ro_id.as_deref());
    let created = ctx
        .ro
        .create("vim", ro_payload)
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    let ro_vim_id = created
        .get("uuid")
        .and_then(Value::as_str)
        .ok_or_else(|| (step.clone(), LcmError::Validation("RO create(\"vim\") returned no uuid".to_string())))?
        .to_string();
    ctx.db
        .set_one(COLLECTION, vim_id, "_admin.deployed.RO", json!(ro_vim_id))
        .await
        .map_err(|e| (step.clone(), e.into()))?;

    let step = "attaching datacenter".to_string();
    let account_payload = build_vim_account_payload(&doc);
    ctx.ro
        .attach_datacenter(&ro_vim_id, account_payload)
        .await
        .map_err(|e| (step.clone(), e.into()))?;

    ctx.db
        .set_one(COLLECTION, vim_id, "_admin.operationalState", json!("ENABLED"))
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    ctx.db
        .set_one(COLLECTION, vim_id, "_admin.detailed-status", json!("Done"))
        .await
        .map_err(|e| (step, e.into()))?;
    Ok(())
}

pub async fn vim_edit(ctx: &LcmContext, vim_id: &str) -> Result<(), LcmError> {
    match run_edit(ctx, vim_id).await {
        Ok(()) => Ok(()),
        Err((step, err)) => {
            record_error(ctx, COLLECTION, vim_id, &step, &err).await;
            Err(err)
        }
    }
}

async fn run_edit(ctx: &LcmContext, vim_id: &str) -> Result<(), (String, LcmError)> {
    let step = "loading vim account".to_string();
    let doc = ctx
        .db
        .get_one(COLLECTION, vim_id)
        .await
        .map_err(|e| (step.clone(), e.into()))?;
    let ro_vim_id = doc
        .pointer("/_admin/deployed/RO")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            (step.clone(), LcmError::Validation(format!("vim account {vim_id} has no RO id to edit")))
        })?
        .to_string();

    let sdn_ro_id = resolve_sdn_ro_id(ctx, &doc).await?;

    let step = "editing vim at RO".to_string();
    let ro_payload = build_ro_vim_payload(&doc, sdn_ro_id.as_deref());
    ctx.ro
        .edit("vim", &ro_vim_id, ro_payload)
        .await
        .map_err(|e| (step.clone(), e.into()))?;

    let account_payload = build_vim_account_payload(&doc);
    if account_payload.as_object().is_some_and(|m| !m.is_empty()) {
        let step = "editing vim_account at RO".to_string();
        ctx.ro
            .edit("vim_account", &ro_vim_id, account_payload)
            .await
            .map_err(|e| (step, e.into()))?;
    }

    ctx.db
        .set_one(COLLECTION, vim_id, "_admin.detailed-status", json!("Done"))
        .await
        .map_err(|e| (step, e.into()))?;
    Ok(())
}

pub async fn vim_delete(ctx: &LcmContext, vim_id: &str) -> Result<(), LcmError> {
    match run_delete(ctx, vim_id).await {
        Ok(()) => Ok(()),
        Err((step, err)) => {
            record_error(ctx, COLLECTION, vim_id, &step, &err).await;
            Err(err)
        }
    }
}

async fn run_delete(ctx: &LcmContext, vim_id: &str) -> Result<(), (String, LcmError)> {
    let step = "loading vim account".to_string();
    let doc = ctx
        .db
        .get_one(COLLECTION, vim_id)
        .await
        .map_err(|e| (step, e.into()))?;

    if let Some(ro_vim_id) = doc.pointer("/_admin/deployed/RO").and_then(Value::as_str) {
        let step = "detaching datacenter".to_string();
        match ctx.ro.detach_datacenter(ro_vim_id).await {
            Ok(()) | Err(lcm_adapters::RoError::NotFound) => {}
            Err(e) => return Err((step, e.into())),
        }

        let step = "deleting vim at RO".to_string();
        match ctx.ro.delete("vim", ro_vim_id).await {
            Ok(()) => {}
            Err(lcm_adapters::RoError::NotFound) => {
                tracing::info!(vim_id, ro_vim_id, "vim already gone at RO");
            }
            Err(e) => return Err((step, e.into())),
        }
    }

    // Row removal is predicated on the RO deletion above having succeeded or 404'd; on any
    // other RO error we return above and the row (and its ERROR state) survives for retry.
    ctx.db
        .del_one(COLLECTION, vim_id)
        .await
        .map_err(|e| ("removing vim account row".to_string(), e.into()))?;
    Ok(())
}

#[cfg(test)]
#[path = "vim_tests.rs"]
mod tests;
