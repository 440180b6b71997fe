// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[tokio::test]
async fn create_assigns_a_uuid_and_get_list_finds_it_by_osm_id() {
    let ro = FakeRo::new();
    let created = ro
        .create("vnfd", json!({"osm_id": "ns1.vnfdA"}))
        .await
        .unwrap();
    assert!(created["uuid"].as_str().is_some());

    let found = ro.get_list("vnfd", json!({"osm_id": "ns1.vnfdA"})).await.unwrap();
    assert_eq!(found.len(), 1);

    let not_found = ro.get_list("vnfd", json!({"osm_id": "other"})).await.unwrap();
    assert!(not_found.is_empty());
}

#[tokio::test]
async fn delete_of_unknown_id_is_not_found() {
    let ro = FakeRo::new();
    let err = ro.delete("vim", "no-such-uuid").await.unwrap_err();
    assert!(matches!(err, RoError::NotFound));
}

#[tokio::test]
async fn vnf_info_queue_lets_tests_script_a_409_then_success() {
    let ro = FakeRo::new();
    ro.queue_vnf_info(Err(RoError::Conflict));
    ro.queue_vnf_info(Ok(HashMap::from([(
        "1".to_string(),
        VnfInfo {
            ip_address: Some("10.0.0.5".to_string()),
            vdur: HashMap::new(),
        },
    )])));

    let desc = json!({});
    assert!(matches!(
        ro.get_ns_vnf_info(&desc).await,
        Err(RoError::Conflict)
    ));
    let second = ro.get_ns_vnf_info(&desc).await.unwrap();
    assert_eq!(second["1"].ip_address.as_deref(), Some("10.0.0.5"));
}

#[test]
fn check_ns_status_classifies_active_and_error() {
    let ro = FakeRo::new();
    assert_eq!(
        ro.check_ns_status(&json!({"status": "ACTIVE"})).0,
        NsRoState::Active
    );
    assert_eq!(
        ro.check_ns_status(&json!({"status": "ERROR", "status_info": "boom"})).0,
        NsRoState::Error
    );
}
