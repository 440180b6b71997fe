// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::fixture;
use serde_json::json;

#[tokio::test]
async fn vim_create_happy_path() {
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

    vim_create(&f.ctx, "v1").await.unwrap();

    let doc = f.db.get_one("vim_accounts", "v1").await.unwrap();
    let ro_id = doc.pointer("/_admin/deployed/RO").unwrap().as_str().unwrap();
    assert!(!ro_id.is_empty());
    assert_eq!(doc.pointer("/_admin/operationalState"), Some(&json!("ENABLED")));
    assert_eq!(f.ro.attach_calls(), vec![ro_id.to_string()]);
}

#[tokio::test]
async fn vim_delete_already_gone() {
    let f = fixture();
    f.db.insert(
        "vim_accounts",
        "v1",
        json!({
            "_id": "v1",
            "_admin": {"deployed": {"RO": "RO-1"}, "operationalState": "ENABLED", "detailed-status": "Done"},
        }),
    );
    // Neither detach nor delete has anything seeded under "RO-1", so both calls 404.

    vim_delete(&f.ctx, "v1").await.unwrap();

    assert!(!f.db.contains("vim_accounts", "v1"));
}

#[tokio::test]
async fn vim_create_fails_on_undeployed_sdn_controller() {
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
            "config": {"sdn-controller": "s1"},
            "_admin": {"deployed": {"RO": null}, "operationalState": "PROCESSING", "detailed-status": ""},
        }),
    );
    f.db.insert(
        "sdns",
        "s1",
        json!({"_id": "s1", "_admin": {"deployed": {}, "operationalState": "PROCESSING", "detailed-status": ""}}),
    );

    let err = vim_create(&f.ctx, "v1").await.unwrap_err();
    assert!(matches!(err, LcmError::Validation(_)));

    let doc = f.db.get_one("vim_accounts", "v1").await.unwrap();
    assert_eq!(doc.pointer("/_admin/operationalState"), Some(&json!("ERROR")));
    let detail = doc.pointer("/_admin/detailed-status").unwrap().as_str().unwrap();
    assert!(detail.starts_with("ERROR Getting sdn-controller-id="), "{detail}");
}
