// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lcm_core::VnfdId;
use serde_json::json;

fn vnfd() -> Vnfd {
    Vnfd {
        id: VnfdId::new("v1"),
        name: "vnfdA".to_string(),
        vdu: Vec::new(),
        vnf_configuration: None,
        rest: Default::default(),
    }
}

#[tokio::test]
async fn deploy_and_remove_are_recorded() {
    let vca = FakeVca::default();
    vca.login().await.unwrap();
    vca.deploy_charms("default", "app-1", &vnfd(), "/charms/a", json!({}))
        .await
        .unwrap();
    vca.remove_charms("default", "app-1").await.unwrap();

    let calls = vca.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], VcaCall::Deploy { application, .. } if application == "app-1"));
    assert!(matches!(&calls[1], VcaCall::Remove { application } if application == "app-1"));
}

#[tokio::test]
async fn fail_for_makes_deploy_error_for_that_application_only() {
    let vca = FakeVca::default();
    vca.fail_for("app-bad");
    assert!(vca
        .deploy_charms("default", "app-bad", &vnfd(), "/charms/a", json!({}))
        .await
        .is_err());
    assert!(vca
        .deploy_charms("default", "app-good", &vnfd(), "/charms/a", json!({}))
        .await
        .is_ok());
}
