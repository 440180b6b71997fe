// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::fixture;
use serde_json::json;
use std::time::Duration as StdDuration;

fn seed_nsd(vnfd_id: &str, idx: &str) -> Value {
    json!({
        "_id": "nsd1",
        "constituent-vnfd": [{"vnfd-id-ref": vnfd_id, "member-vnf-index": idx}],
    })
}

fn seed_nsr(nsr_id: &str, nsd: Value, existing_ro_ns_id: &str) -> Value {
    json!({
        "_id": nsr_id,
        "name": "ns-under-test",
        "nsd": nsd,
        "_admin": {
            "deployed": {
                "id": nsr_id,
                "RO": {"vnfd_id": {}, "nsd_id": null, "nsr_id": existing_ro_ns_id, "nsr_status": "BUILD"},
                "nsr_ip": {},
                "VCA": {},
            },
        },
    })
}

fn vnfd_without_charms(id: &str) -> Value {
    json!({"_id": id, "name": id, "vdu": []})
}

fn vnfd_with_charm(id: &str) -> Value {
    json!({
        "_id": id,
        "name": id,
        "vdu": [],
        "vnf-configuration": {"juju": {"charm": "simple", "initial-config-primitive": []}},
    })
}

fn vnfr(nsr_id: &str, idx: &str) -> Value {
    json!({"nsr-id-ref": nsr_id, "member-vnf-index-ref": idx, "vdur": []})
}

#[tokio::test]
async fn completes_immediately_when_the_ns_has_no_charmed_vnfs() {
    let f = fixture();
    f.db.insert("vnfds", "vnfd1", vnfd_without_charms("vnfd1"));
    f.db.insert("vnfrs", "ns1:1", vnfr("ns1", "1"));
    f.db.insert("nsrs", "ns1", seed_nsr("ns1", seed_nsd("vnfd1", "1"), "ro-ns-1"));
    f.db.insert("nslcmops", "op1", json!({"_id": "op1", "operationState": "PROCESSING"}));
    f.ro.seed("ns", "ro-ns-1", json!({"status": "ACTIVE"}));
    f.ro.queue_vnf_info(Ok(std::collections::HashMap::from([(
        "1".to_string(),
        VnfInfo {
            ip_address: Some("10.0.0.5".to_string()),
            vdur: Default::default(),
        },
    )])));

    let ctx = Arc::new(f.ctx);
    ns_instantiate(&ctx, "ns1", "op1", 1, "packages", "pkg").await.unwrap();

    let op = f.db.get_one("nslcmops", "op1").await.unwrap();
    assert_eq!(op["operationState"], json!("COMPLETED"));
    assert_eq!(op["detailed-status"], json!("Done"));
    let nsr = f.db.get_one("nsrs", "ns1").await.unwrap();
    assert_eq!(nsr["config-status"], json!("configured"));
    assert_eq!(nsr["operational-status"], json!("running"));
    let vnfr = f.db.get_one("vnfrs", "ns1:1").await.unwrap();
    assert_eq!(vnfr["ip-address"], json!("10.0.0.5"));
}

#[tokio::test]
async fn fans_out_a_charm_deploy_for_a_charmed_vnf() {
    let f = fixture();
    f.db.insert("vnfds", "vnfd1", vnfd_without_charms("vnfd1"));
    f.db.insert("vnfds", "vnfd2", vnfd_with_charm("vnfd2"));
    f.db.insert("vnfrs", "ns1:1", vnfr("ns1", "1"));
    f.db.insert("vnfrs", "ns1:2", vnfr("ns1", "2"));
    let nsd = json!({
        "_id": "nsd1",
        "constituent-vnfd": [
            {"vnfd-id-ref": "vnfd1", "member-vnf-index": "1"},
            {"vnfd-id-ref": "vnfd2", "member-vnf-index": "2"},
        ],
    });
    f.db.insert("nsrs", "ns1", seed_nsr("ns1", nsd, "ro-ns-1"));
    f.db.insert("nslcmops", "op1", json!({"_id": "op1", "operationState": "PROCESSING"}));
    f.ro.seed("ns", "ro-ns-1", json!({"status": "ACTIVE"}));
    f.ro.queue_vnf_info(Ok(std::collections::HashMap::new()));

    let ctx = Arc::new(f.ctx);
    ns_instantiate(&ctx, "ns1", "op1", 1, "packages", "pkg").await.unwrap();

    let nsr = f.db.get_one("nsrs", "ns1").await.unwrap();
    assert_eq!(nsr["config-status"], json!("configuring"));
    let op = f.db.get_one("nslcmops", "op1").await.unwrap();
    assert_eq!(op["detailed-status"], json!("configuring: init: 1"));

    tokio::time::sleep(StdDuration::from_millis(50)).await;
    let calls = f.vca.calls();
    assert_eq!(calls.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn times_out_when_ro_never_reaches_active() {
    let f = fixture();
    f.db.insert("vnfds", "vnfd1", vnfd_without_charms("vnfd1"));
    f.db.insert("vnfrs", "ns1:1", vnfr("ns1", "1"));
    f.db.insert("nsrs", "ns1", seed_nsr("ns1", seed_nsd("vnfd1", "1"), "ro-ns-1"));
    f.db.insert("nslcmops", "op1", json!({"_id": "op1", "operationState": "PROCESSING"}));
    f.ro.seed("ns", "ro-ns-1", json!({"status": "BUILD"}));

    let clock = f.clock.clone();
    let ctx = Arc::new(f.ctx);
    let handle = tokio::spawn(async move { ns_instantiate(&ctx, "ns1", "op1", 1, "packages", "pkg").await });

    for _ in 0..8 {
        tokio::time::advance(StdDuration::from_secs(1000)).await;
        clock.advance(chrono::Duration::seconds(1000));
        tokio::task::yield_now().await;
    }

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(LcmError::Timeout(_))));
    let nsr = f.db.get_one("nsrs", "ns1").await.unwrap();
    assert_eq!(nsr["operational-status"], json!("failed"));
}

#[tokio::test(start_paused = true)]
async fn cancelling_via_the_registry_stops_the_poll_loop_without_an_error_trail() {
    let f = fixture();
    f.db.insert("vnfds", "vnfd1", vnfd_without_charms("vnfd1"));
    f.db.insert("vnfrs", "ns1:1", vnfr("ns1", "1"));
    f.db.insert("nsrs", "ns1", seed_nsr("ns1", seed_nsd("vnfd1", "1"), "ro-ns-1"));
    f.db.insert("nslcmops", "op1", json!({"_id": "op1", "operationState": "PROCESSING"}));
    f.ro.seed("ns", "ro-ns-1", json!({"status": "BUILD"}));

    let ctx = Arc::new(f.ctx);
    let ctx2 = ctx.clone();
    let handle = tokio::spawn(async move { ns_instantiate(&ctx2, "ns1", "op1", 1, "packages", "pkg").await });

    // Let the workflow register its poll token and enter the BUILD-state wait before asking
    // the registry to cancel it — this is the same token `cancel_tasks` trips for a real
    // `ns terminate` racing an in-flight instantiate.
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    ctx.registry.cancel_tasks(Topic::Ns, "ns1");

    let result = handle.await.unwrap();
    assert!(result.is_ok());
    let op = f.db.get_one("nslcmops", "op1").await.unwrap();
    assert_eq!(op["operationState"], json!("PROCESSING"), "a cancelled instantiate must not write an error trail");
}
