// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The task registry: indexes in-flight workflows by `(topic, entity-id, order-id, task-name)`
//! and is the sole owner of their cancellation tokens. Entries are retained until the process
//! exits — an intentional simplification, not a leak that needs fixing.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Ns,
    VimAccount,
    Sdn,
}

/// A handle to a supervised workflow task. `token` is what `cancel_tasks` trips; the workflow
/// itself owns the `JoinHandle` (dropping it here would detach the task, which we don't want —
/// the registry only needs to request cancellation, not join).
#[derive(Clone)]
pub struct TaskHandle {
    pub token: CancellationToken,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }
}

impl Default for TaskHandle {
    fn default() -> Self {
        Self::new()
    }
}

type OrderMap = HashMap<u64, HashMap<String, TaskHandle>>;

#[derive(Default)]
pub struct TaskRegistry {
    tables: Mutex<HashMap<Topic, HashMap<String, OrderMap>>>,
    next_order_id: AtomicU64,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A monotonically increasing id shared across all topics, assigned once per bus message.
    pub fn next_order_id(&self) -> u64 {
        self.next_order_id.fetch_add(1, Ordering::SeqCst)
    }

    pub fn register(
        &self,
        topic: Topic,
        entity_id: &str,
        order_id: u64,
        task_name: &str,
        handle: TaskHandle,
    ) {
        self.tables
            .lock()
            .entry(topic)
            .or_default()
            .entry(entity_id.to_string())
            .or_default()
            .entry(order_id)
            .or_default()
            .insert(task_name.to_string(), handle);
    }

    /// Requests cooperative cancellation on every live task for `entity_id` under `topic`, then
    /// clears the entire per-entity map — including order-ids the caller didn't ask about,
    /// matching the source's unconditional `registry[topic][entity_id] = {}`.
    pub fn cancel_tasks(&self, topic: Topic, entity_id: &str) {
        let mut tables = self.tables.lock();
        if let Some(entities) = tables.get_mut(&topic) {
            if let Some(orders) = entities.get_mut(entity_id) {
                for tasks in orders.values() {
                    for handle in tasks.values() {
                        handle.token.cancel();
                    }
                }
            }
            entities.insert(entity_id.to_string(), HashMap::new());
        }
    }

    /// Total live task-names registered for `entity_id`, across every order-id. Test-only
    /// introspection; the dispatch loop never needs to count its own registrations.
    pub fn live_count(&self, topic: Topic, entity_id: &str) -> usize {
        self.tables
            .lock()
            .get(&topic)
            .and_then(|e| e.get(entity_id))
            .map(|orders| orders.values().map(|tasks| tasks.len()).sum())
            .unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
