// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[tokio::test]
async fn read_returns_pushed_messages_in_order() {
    let bus = FakeMsg::new();
    bus.push("ns", "instantiate", json!({"_id": "ns1"}));
    bus.push("ns", "terminate", json!({"_id": "ns1"}));

    let (first, _) = bus.read().await.unwrap();
    assert_eq!(first.command, "instantiate");
    let (second, _) = bus.read().await.unwrap();
    assert_eq!(second.command, "terminate");
}

#[tokio::test]
async fn write_is_recorded_for_assertions() {
    let bus = FakeMsg::new();
    bus.write("admin", "ping", json!({"from": "lcm", "to": "lcm"}))
        .await
        .unwrap();
    let written = bus.written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].0, "admin");
    assert_eq!(written[0].1, "ping");
}
