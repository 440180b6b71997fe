// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `Ro` for workflow tests: scripts per-kind responses instead of talking HTTP.

use crate::error::RoError;
use crate::ro::{default_check_ns_status, NsRoState, Ro, VnfInfo};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct FakeRo {
    resources: Mutex<HashMap<(String, String), Value>>,
    /// Queued `get_ns_vnf_info` responses, popped front-to-back — lets a test script the
    /// "409 not ready yet, then success" sequence the ACTIVE poll branch depends on.
    vnf_info_queue: Mutex<Vec<Result<HashMap<String, VnfInfo>, RoError>>>,
    attach_calls: Mutex<Vec<String>>,
    detach_calls: Mutex<Vec<String>>,
    /// `(kind, id)` pairs whose `delete` should report a 409 conflict instead of succeeding.
    conflicted_deletes: Mutex<Vec<(String, String)>>,
}

impl FakeRo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, kind: &str, id: &str, desc: Value) {
        self.resources
            .lock()
            .insert((kind.to_string(), id.to_string()), desc);
    }

    pub fn queue_vnf_info(&self, result: Result<HashMap<String, VnfInfo>, RoError>) {
        self.vnf_info_queue.lock().push(result);
    }

    pub fn attach_calls(&self) -> Vec<String> {
        self.attach_calls.lock().clone()
    }

    pub fn detach_calls(&self) -> Vec<String> {
        self.detach_calls.lock().clone()
    }

    pub fn conflict_on_delete(&self, kind: &str, id: &str) {
        self.conflicted_deletes
            .lock()
            .push((kind.to_string(), id.to_string()));
    }
}

#[async_trait]
impl Ro for FakeRo {
    async fn create(&self, kind: &str, mut descriptor: Value) -> Result<Value, RoError> {
        let uuid = Uuid::new_v4().to_string();
        if let Some(obj) = descriptor.as_object_mut() {
            obj.insert("uuid".to_string(), Value::String(uuid.clone()));
        }
        self.resources
            .lock()
            .insert((kind.to_string(), uuid.clone()), descriptor.clone());
        Ok(descriptor)
    }

    async fn edit(&self, kind: &str, id: &str, descriptor: Value) -> Result<(), RoError> {
        let mut resources = self.resources.lock();
        if resources.contains_key(&(kind.to_string(), id.to_string())) {
            resources.insert((kind.to_string(), id.to_string()), descriptor);
            Ok(())
        } else {
            Err(RoError::NotFound)
        }
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<(), RoError> {
        let key = (kind.to_string(), id.to_string());
        if self.conflicted_deletes.lock().contains(&key) {
            return Err(RoError::Conflict);
        }
        self.resources.lock().remove(&key).map(|_| ()).ok_or(RoError::NotFound)
    }

    async fn show(&self, kind: &str, id: &str) -> Result<Value, RoError> {
        self.resources
            .lock()
            .get(&(kind.to_string(), id.to_string()))
            .cloned()
            .ok_or(RoError::NotFound)
    }

    async fn get_list(&self, kind: &str, filter_by: Value) -> Result<Vec<Value>, RoError> {
        let osm_id = filter_by.get("osm_id").and_then(Value::as_str);
        Ok(self
            .resources
            .lock()
            .iter()
            .filter(|((k, _), v)| {
                k == kind
                    && match osm_id {
                        Some(want) => v.get("osm_id").and_then(Value::as_str) == Some(want),
                        None => true,
                    }
            })
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn attach_datacenter(&self, id: &str, _descriptor: Value) -> Result<(), RoError> {
        self.attach_calls.lock().push(id.to_string());
        Ok(())
    }

    async fn detach_datacenter(&self, id: &str) -> Result<(), RoError> {
        self.detach_calls.lock().push(id.to_string());
        Ok(())
    }

    fn check_ns_status(&self, desc: &Value) -> (NsRoState, String) {
        default_check_ns_status(desc)
    }

    async fn get_ns_vnf_info(&self, _desc: &Value) -> Result<HashMap<String, VnfInfo>, RoError> {
        let mut queue = self.vnf_info_queue.lock();
        if queue.is_empty() {
            Ok(HashMap::new())
        } else {
            queue.remove(0)
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
