// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::fixture;
use serde_json::json;

fn seed_nsr(nsr_id: &str, operational_status: &str) -> Value {
    json!({
        "_id": nsr_id,
        "_admin": {
            "deployed": {
                "VCA": {
                    "1": {
                        "model": "default",
                        "application": "ns1-1-vnfd1",
                        "operational-status": operational_status,
                    },
                },
            },
        },
    })
}

fn seed_op(vnf_index: &str, primitive: &str) -> Value {
    json!({
        "_id": "op1",
        "operationState": "PROCESSING",
        "operationParams": {"member_vnf_index": vnf_index, "primitive": primitive, "primitive_params": {}},
    })
}

#[tokio::test]
async fn executes_the_primitive_against_an_active_unit() {
    let f = fixture();
    f.db.insert("nsrs", "ns1", seed_nsr("ns1", "active"));
    f.db.insert("nslcmops", "op1", seed_op("1", "touch"));

    let ctx = Arc::new(f.ctx);
    ns_action(&ctx, "ns1", "op1", 1).await.unwrap();

    let op = f.db.get_one("nslcmops", "op1").await.unwrap();
    assert_eq!(op["operationState"], json!("COMPLETED"));
    assert_eq!(op["detailed-status"], json!("Done"));
    assert!(f
        .vca
        .calls()
        .iter()
        .any(|c| matches!(c, lcm_adapters::VcaCall::ExecutePrimitive { primitive, .. } if primitive == "touch")));
}

#[tokio::test]
async fn refuses_to_act_on_a_non_active_unit() {
    let f = fixture();
    f.db.insert("nsrs", "ns1", seed_nsr("ns1", "blocked"));
    f.db.insert("nslcmops", "op1", seed_op("1", "touch"));

    let ctx = Arc::new(f.ctx);
    let err = ns_action(&ctx, "ns1", "op1", 1).await.unwrap_err();
    assert!(matches!(err, LcmError::Validation(_)));

    let op = f.db.get_one("nslcmops", "op1").await.unwrap();
    assert_eq!(op["operationState"], json!("FAILED"));
    assert!(op["detailed-status"].as_str().unwrap().contains("not 'active'"));
    assert!(f.vca.calls().is_empty());
}

#[tokio::test]
async fn records_a_vca_execution_failure() {
    let f = fixture();
    f.db.insert("nsrs", "ns1", seed_nsr("ns1", "active"));
    f.db.insert("nslcmops", "op1", seed_op("1", "touch"));
    f.vca.fail_for("ns1-1-vnfd1");

    let ctx = Arc::new(f.ctx);
    ns_action(&ctx, "ns1", "op1", 1).await.unwrap();

    let op = f.db.get_one("nslcmops", "op1").await.unwrap();
    assert_eq!(op["operationState"], json!("FAILED"));
    assert_ne!(op["detailed-status"], json!("Done"));
}
