// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lcm_adapters::{FakeDb, FakeFs};
use lcm_core::{Vdu, VnfdId};
use serde_json::json;

fn vnfd_with_cloud_init() -> Vnfd {
    Vnfd {
        id: VnfdId::new("vnfdA"),
        name: "vnfdA".to_string(),
        vdu: vec![Vdu {
            vdu_id: "vdu1".to_string(),
            cloud_init_file: Some("vdu1.cfg".to_string()),
            vdu_configuration: None,
        }],
        vnf_configuration: None,
        rest: Default::default(),
    }
}

#[tokio::test]
async fn vnfd2_ro_strips_id_and_inlines_cloud_init() {
    let fs = FakeFs::new("/var/osm");
    fs.put("packages/pkg/cloud_init/vdu1.cfg", b"#cloud-config\n".to_vec());

    let out = vnfd2_ro(&fs, &vnfd_with_cloud_init(), Some("ns1.vnfdA"), "packages", "pkg")
        .await
        .unwrap();

    assert_eq!(out["id"], json!("ns1.vnfdA"));
    assert!(out.get("_id").is_none());
    assert_eq!(out["vdu"][0]["cloud-init"], json!("#cloud-config\n"));
    assert!(out["vdu"][0].get("cloud-init-file").is_none());
}

#[tokio::test]
async fn vnfd2_ro_is_pure_given_the_same_fs_contents() {
    let fs = FakeFs::new("/var/osm");
    fs.put("packages/pkg/cloud_init/vdu1.cfg", b"same\n".to_vec());
    let vnfd = vnfd_with_cloud_init();

    let first = vnfd2_ro(&fs, &vnfd, Some("X"), "packages", "pkg").await.unwrap();
    let second = vnfd2_ro(&fs, &vnfd, Some("X"), "packages", "pkg").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn ns_params_2_ro_is_none_for_empty_params() {
    let db = FakeDb::new();
    assert!(ns_params_2_ro(&db, &json!({})).await.unwrap().is_none());
    assert!(ns_params_2_ro(&db, &json!(null)).await.unwrap().is_none());
}

#[tokio::test]
async fn ns_params_2_ro_rejects_a_vim_that_is_not_enabled() {
    let db = FakeDb::new();
    db.insert(
        "vim_accounts",
        "v1",
        json!({"_admin": {"operationalState": "PROCESSING"}}),
    );
    let err = ns_params_2_ro(&db, &json!({"vimAccountId": "v1"}))
        .await
        .unwrap_err();
    assert!(matches!(err, LcmError::Validation(_)));
}

#[tokio::test]
async fn ns_params_2_ro_builds_a_site_per_mapping_entry() {
    let db = FakeDb::new();
    db.insert(
        "vim_accounts",
        "v1",
        json!({"_admin": {"operationalState": "ENABLED", "deployed": {"RO": "RO-v1"}}}),
    );
    let params = json!({
        "vimAccountId": "v1",
        "vld": [{"name": "mgmt", "vim-network-name": {"v1": "net0"}}],
    });
    let out = ns_params_2_ro(&db, &params).await.unwrap().unwrap();
    assert_eq!(out["datacenter"], json!("RO-v1"));
    assert_eq!(out["networks"][0]["sites"][0]["datacenter"], json!("RO-v1"));
    assert_eq!(out["networks"][0]["sites"][0]["netmap-use"], json!("net0"));
}

#[tokio::test]
async fn ns_params_2_ro_string_network_name_has_no_datacenter() {
    let db = FakeDb::new();
    let params = json!({"vld": [{"name": "mgmt", "vim-network-name": "net0"}]});
    let out = ns_params_2_ro(&db, &params).await.unwrap().unwrap();
    let site = &out["networks"][0]["sites"][0];
    assert_eq!(site["netmap-use"], json!("net0"));
    assert!(site.get("datacenter").is_none());
}
