// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dispatch loop: consumes the bus in arrival order, assigns each record a monotonic
//! `order_id`, and routes it to a supervised workflow. Transient bus failures are tolerated up
//! to a threshold that relaxes once the loop has processed at least one message.

use crate::context::LcmContext;
use crate::error::LcmError;
use crate::ns_action::ns_action;
use crate::ns_instantiate::ns_instantiate;
use crate::ns_terminate::ns_terminate;
use crate::registry::Topic;
use crate::sdn::{sdn_create, sdn_delete, sdn_edit};
use crate::vim::{vim_create, vim_delete, vim_edit};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const STARTUP_ERROR_THRESHOLD: u32 = 30;
const STEADY_STATE_ERROR_THRESHOLD: u32 = 8;
const STARTUP_BACKOFF: Duration = Duration::from_secs(5);
const STEADY_STATE_BACKOFF: Duration = Duration::from_secs(2);

/// Runs until an `admin/exit` command arrives (clean shutdown) or the consecutive bus-error
/// tolerance is exhausted (returns `Err`, the caller exits the process non-zero).
pub async fn run(ctx: Arc<LcmContext>) -> Result<(), LcmError> {
    let mut consecutive_errors: u32 = 0;
    let mut seen_a_message = false;

    loop {
        match ctx.msg.read().await {
            Ok((msg, params)) => {
                consecutive_errors = 0;
                seen_a_message = true;
                if !route(&ctx, &msg.topic, &msg.command, params).await {
                    return Ok(());
                }
            }
            Err(e) => {
                consecutive_errors += 1;
                let threshold = if seen_a_message {
                    STEADY_STATE_ERROR_THRESHOLD
                } else {
                    STARTUP_ERROR_THRESHOLD
                };
                tracing::warn!(error = %e, consecutive_errors, threshold, "bus read failed");
                if consecutive_errors >= threshold {
                    return Err(LcmError::Validation(format!(
                        "bus unusable after {consecutive_errors} consecutive errors: {e}"
                    )));
                }
                let backoff = if seen_a_message { STEADY_STATE_BACKOFF } else { STARTUP_BACKOFF };
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

fn str_field<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(Value::as_str)
}

/// Returns `false` to request the loop stop (an `admin/exit` command).
async fn route(ctx: &Arc<LcmContext>, topic: &str, command: &str, params: Value) -> bool {
    match (topic, command) {
        ("admin", "ping") => {
            if str_field(&params, "to") == Some("lcm") && str_field(&params, "from") == Some("lcm") {
                ctx.note_ping_received();
            }
            true
        }
        ("admin", "exit") => false,
        ("admin", _) => true,
        ("ns", "instantiate") => {
            spawn_ns_instantiate(ctx, &params);
            true
        }
        ("ns", "terminate") => {
            if let Some(nsr_id) = str_field(&params, "nsr_id").map(str::to_string) {
                ctx.registry.cancel_tasks(Topic::Ns, &nsr_id);
            }
            spawn_ns_terminate(ctx, &params);
            true
        }
        ("ns", "action") => {
            spawn_ns_action(ctx, &params);
            true
        }
        ("ns", _) => true,
        ("vim_account", "create") => {
            spawn_entity(ctx, Topic::VimAccount, "vim_id", &params, "vim_create", |ctx, id| async move {
                vim_create(&ctx, &id).await
            });
            true
        }
        ("vim_account", "edit") => {
            spawn_entity(ctx, Topic::VimAccount, "vim_id", &params, "vim_edit", |ctx, id| async move {
                vim_edit(&ctx, &id).await
            });
            true
        }
        ("vim_account", "delete") => {
            if let Some(vim_id) = str_field(&params, "vim_id").map(str::to_string) {
                ctx.registry.cancel_tasks(Topic::VimAccount, &vim_id);
            }
            spawn_entity(ctx, Topic::VimAccount, "vim_id", &params, "vim_delete", |ctx, id| async move {
                vim_delete(&ctx, &id).await
            });
            true
        }
        ("sdn", "create") => {
            spawn_entity(ctx, Topic::Sdn, "sdn_id", &params, "sdn_create", |ctx, id| async move {
                sdn_create(&ctx, &id).await
            });
            true
        }
        ("sdn", "edit") => {
            spawn_entity(ctx, Topic::Sdn, "sdn_id", &params, "sdn_edit", |ctx, id| async move {
                sdn_edit(&ctx, &id).await
            });
            true
        }
        ("sdn", "delete") => {
            if let Some(sdn_id) = str_field(&params, "sdn_id").map(str::to_string) {
                ctx.registry.cancel_tasks(Topic::Sdn, &sdn_id);
            }
            spawn_entity(ctx, Topic::Sdn, "sdn_id", &params, "sdn_delete", |ctx, id| async move {
                sdn_delete(&ctx, &id).await
            });
            true
        }
        _ => {
            tracing::debug!(topic, command, "unhandled bus command");
            true
        }
    }
}

/// `vim_account`/`sdn` verbs key off a single id field, named `id_field` in `params`.
fn spawn_entity<F, Fut>(ctx: &Arc<LcmContext>, topic: Topic, id_field: &str, params: &Value, task_name: &'static str, workflow: F)
where
    F: FnOnce(Arc<LcmContext>, String) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<(), LcmError>> + Send + 'static,
{
    let Some(entity_id) = str_field(params, id_field).map(str::to_string) else {
        tracing::warn!(task_name, id_field, "dropping command: missing id field");
        return;
    };
    let order_id = ctx.registry.next_order_id();
    let ctx2 = Arc::clone(ctx);
    let entity_id2 = entity_id.clone();
    ctx.spawn_supervised(topic, &entity_id, order_id, task_name, async move {
        if let Err(e) = workflow(ctx2, entity_id2.clone()).await {
            tracing::warn!(entity_id = %entity_id2, error = %e, task_name, "workflow failed");
        }
    });
}

fn spawn_ns_instantiate(ctx: &Arc<LcmContext>, params: &Value) {
    let Some(nsr_id) = str_field(params, "nsr_id").map(str::to_string) else {
        tracing::warn!("dropping ns instantiate: missing nsr_id");
        return;
    };
    let Some(nslcmop_id) = str_field(params, "nslcmop_id").map(str::to_string) else {
        tracing::warn!("dropping ns instantiate: missing nslcmop_id");
        return;
    };
    let order_id = ctx.registry.next_order_id();
    let ctx2 = Arc::clone(ctx);
    let nsr_id2 = nsr_id.clone();
    ctx.spawn_supervised(Topic::Ns, &nsr_id, order_id, "ns_instantiate", async move {
        let result = ns_instantiate(&ctx2, &nsr_id2, &nslcmop_id, order_id, "packages", "package").await;
        if let Err(e) = result {
            tracing::warn!(nsr_id = %nsr_id2, error = %e, "ns_instantiate failed");
        }
    });
}

fn spawn_ns_terminate(ctx: &Arc<LcmContext>, params: &Value) {
    let Some(nsr_id) = str_field(params, "nsr_id").map(str::to_string) else {
        tracing::warn!("dropping ns terminate: missing nsr_id");
        return;
    };
    let Some(nslcmop_id) = str_field(params, "nslcmop_id").map(str::to_string) else {
        tracing::warn!("dropping ns terminate: missing nslcmop_id");
        return;
    };
    let order_id = ctx.registry.next_order_id();
    let ctx2 = Arc::clone(ctx);
    let nsr_id2 = nsr_id.clone();
    ctx.spawn_supervised(Topic::Ns, &nsr_id, order_id, "ns_terminate", async move {
        let result = ns_terminate(&ctx2, &nsr_id2, &nslcmop_id, order_id).await;
        if let Err(e) = result {
            tracing::warn!(nsr_id = %nsr_id2, error = %e, "ns_terminate failed");
        }
    });
}

fn spawn_ns_action(ctx: &Arc<LcmContext>, params: &Value) {
    let Some(nsr_id) = str_field(params, "nsr_id").map(str::to_string) else {
        tracing::warn!("dropping ns action: missing nsr_id");
        return;
    };
    let Some(nslcmop_id) = str_field(params, "nslcmop_id").map(str::to_string) else {
        tracing::warn!("dropping ns action: missing nslcmop_id");
        return;
    };
    let order_id = ctx.registry.next_order_id();
    let ctx2 = Arc::clone(ctx);
    let nsr_id2 = nsr_id.clone();
    ctx.spawn_supervised(Topic::Ns, &nsr_id, order_id, "ns_action", async move {
        let result = ns_action(&ctx2, &nsr_id2, &nslcmop_id, order_id).await;
        if let Err(e) = result {
            tracing::warn!(nsr_id = %nsr_id2, error = %e, "ns_action failed");
        }
    });
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
