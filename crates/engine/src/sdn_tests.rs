// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::fixture;
use serde_json::json;

#[tokio::test]
async fn sdn_create_happy_path() {
    let f = fixture();
    f.db.insert(
        "sdns",
        "s1",
        json!({
            "_id": "s1",
            "name": "s1",
            "_admin": {"deployed": {"RO": null}, "operationalState": "PROCESSING", "detailed-status": ""},
        }),
    );

    sdn_create(&f.ctx, "s1").await.unwrap();

    let doc = f.db.get_one("sdns", "s1").await.unwrap();
    assert_eq!(doc.pointer("/_admin/operationalState"), Some(&json!("ENABLED")));
    assert!(doc.pointer("/_admin/deployed/RO").unwrap().as_str().is_some());
}

#[tokio::test]
async fn sdn_delete_already_gone() {
    let f = fixture();
    f.db.insert(
        "sdns",
        "s1",
        json!({"_id": "s1", "_admin": {"deployed": {"RO": "RO-1"}, "operationalState": "ENABLED", "detailed-status": "Done"}}),
    );

    sdn_delete(&f.ctx, "s1").await.unwrap();

    assert!(!f.db.contains("sdns", "s1"));
}

#[tokio::test]
async fn sdn_edit_requires_existing_ro_id() {
    let f = fixture();
    f.db.insert(
        "sdns",
        "s1",
        json!({"_id": "s1", "_admin": {"deployed": {"RO": null}, "operationalState": "PROCESSING", "detailed-status": ""}}),
    );

    let err = sdn_edit(&f.ctx, "s1").await.unwrap_err();
    assert!(matches!(err, LcmError::Validation(_)));
}
