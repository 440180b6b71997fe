// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::fixture;
use async_trait::async_trait;
use lcm_adapters::{BusMessage, Msg, MsgError};
use serde_json::json;
use std::time::Duration as StdDuration;

#[tokio::test]
async fn admin_ping_from_lcm_clears_the_self_ping_counter() {
    let f = fixture();
    f.ctx.note_ping_sent();
    f.ctx.note_ping_sent();
    assert!(f.ctx.pings_not_received() > 0);

    let ctx = Arc::new(f.ctx);
    let kept_running = route(&ctx, "admin", "ping", json!({"to": "lcm", "from": "lcm"})).await;

    assert!(kept_running);
    assert_eq!(ctx.pings_not_received(), 0);
}

#[tokio::test]
async fn admin_ping_from_elsewhere_is_ignored() {
    let f = fixture();
    f.ctx.note_ping_sent();
    let ctx = Arc::new(f.ctx);

    route(&ctx, "admin", "ping", json!({"to": "lcm", "from": "ro"})).await;

    assert_eq!(ctx.pings_not_received(), 1);
}

#[tokio::test]
async fn admin_exit_stops_the_loop() {
    let f = fixture();
    let ctx = Arc::new(f.ctx);
    let kept_running = route(&ctx, "admin", "exit", json!({})).await;
    assert!(!kept_running);
}

#[tokio::test]
async fn vim_account_create_spawns_the_workflow() {
    let f = fixture();
    f.db.insert(
        "vim_accounts",
        "v1",
        json!({
            "_id": "v1",
            "vim_type": "openstack",
            "vim_tenant_name": "t",
            "vim_user": "u",
            "vim_password": "p",
            "_admin": {"deployed": {"RO": null}, "operationalState": "PROCESSING", "detailed-status": ""},
        }),
    );
    let ctx = Arc::new(f.ctx);

    route(&ctx, "vim_account", "create", json!({"vim_id": "v1"})).await;
    tokio::time::sleep(StdDuration::from_millis(50)).await;

    let doc = f.db.get_one("vim_accounts", "v1").await.unwrap();
    assert_eq!(doc.pointer("/_admin/operationalState"), Some(&json!("ENABLED")));
}

#[tokio::test]
async fn ns_terminate_cancels_live_tasks_before_dispatching() {
    let f = fixture();
    f.db.insert(
        "nsrs",
        "ns1",
        json!({"_id": "ns1", "_admin": {"nsState": "NOT_INSTANTIATED", "deployed": {"RO": {}, "VCA": {}}}}),
    );
    f.db.insert("nslcmops", "op1", json!({"_id": "op1", "operationState": "PROCESSING"}));
    let ctx = Arc::new(f.ctx);
    ctx.registry.register(
        Topic::Ns,
        "ns1",
        0,
        "create_charm:1",
        crate::registry::TaskHandle::new(),
    );
    assert_eq!(ctx.registry.live_count(Topic::Ns, "ns1"), 1);

    route(&ctx, "ns", "terminate", json!({"nsr_id": "ns1", "nslcmop_id": "op1"})).await;

    assert_eq!(ctx.registry.live_count(Topic::Ns, "ns1"), 0);
}

#[tokio::test]
async fn a_command_missing_its_id_field_is_dropped_without_panicking() {
    let f = fixture();
    let ctx = Arc::new(f.ctx);
    let kept_running = route(&ctx, "ns", "instantiate", json!({"nsr_id": "ns1"})).await;
    assert!(kept_running);
}

struct FlakyMsg;

#[async_trait]
impl Msg for FlakyMsg {
    async fn read(&self) -> Result<(BusMessage, serde_json::Value), MsgError> {
        Err(MsgError::Read("connection reset".to_string()))
    }

    async fn write(&self, _topic: &str, _command: &str, _params: serde_json::Value) -> Result<(), MsgError> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn the_loop_exits_after_exhausting_the_startup_error_budget() {
    let f = fixture();
    let ctx = Arc::new(LcmContext::new(f.db, f.fs, Arc::new(FlakyMsg), f.ro, f.vca, f.clock));

    let handle = tokio::spawn(run(ctx));
    for _ in 0..(STARTUP_ERROR_THRESHOLD + 2) {
        tokio::time::advance(STARTUP_BACKOFF).await;
        tokio::task::yield_now().await;
    }

    let result = handle.await.unwrap();
    assert!(result.is_err());
}
