// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn cancel_tasks_trips_every_token_for_the_entity() {
    let registry = TaskRegistry::new();
    let h1 = TaskHandle::new();
    let h2 = TaskHandle::new();
    registry.register(Topic::Ns, "ns1", 1, "ns_instantiate", h1.clone());
    registry.register(Topic::Ns, "ns1", 2, "ns_action", h2.clone());
    registry.register(Topic::Ns, "ns2", 1, "ns_instantiate", TaskHandle::new());

    registry.cancel_tasks(Topic::Ns, "ns1");

    assert!(h1.token.is_cancelled());
    assert!(h2.token.is_cancelled());
    assert_eq!(registry.live_count(Topic::Ns, "ns1"), 0);
    assert_eq!(registry.live_count(Topic::Ns, "ns2"), 1);
}

#[test]
fn cancel_tasks_then_new_workflow_leaves_only_the_new_one() {
    let registry = TaskRegistry::new();
    registry.register(Topic::Ns, "ns1", 1, "ns_instantiate", TaskHandle::new());
    registry.cancel_tasks(Topic::Ns, "ns1");
    registry.register(Topic::Ns, "ns1", 2, "ns_terminate", TaskHandle::new());

    assert_eq!(registry.live_count(Topic::Ns, "ns1"), 1);
}

#[test]
fn order_ids_are_monotonic_across_topics() {
    let registry = TaskRegistry::new();
    let a = registry.next_order_id();
    let b = registry.next_order_id();
    assert!(b > a);
}
