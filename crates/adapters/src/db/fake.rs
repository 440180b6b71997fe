// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `Db` for workflow tests.

use crate::db::Db;
use crate::error::DbError;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

/// Writes `value` at a dotted path (`"_admin.operationalState"`), creating intermediate
/// objects as needed.
fn set_path(doc: &mut Value, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut cursor = doc;
    while let Some(seg) = segments.next() {
        if !cursor.is_object() {
            *cursor = Value::Object(serde_json::Map::new());
        }
        let Value::Object(obj) = cursor else {
            unreachable!("just coerced to an object above")
        };
        if segments.peek().is_none() {
            obj.insert(seg.to_string(), value);
            return;
        }
        cursor = obj.entry(seg.to_string()).or_insert_with(|| Value::Object(serde_json::Map::new()));
    }
}

fn matches(doc: &Value, filter: &Value) -> bool {
    let Some(filter) = filter.as_object() else {
        return true;
    };
    let Some(doc) = doc.as_object() else {
        return false;
    };
    filter.iter().all(|(k, v)| doc.get(k) == Some(v))
}

#[derive(Default)]
pub struct FakeDb {
    collections: Mutex<HashMap<String, HashMap<String, Value>>>,
}

impl FakeDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document directly, bypassing the trait, the way tests build fixtures.
    pub fn insert(&self, collection: &str, id: impl Into<String>, doc: Value) {
        self.collections
            .lock()
            .entry(collection.to_string())
            .or_default()
            .insert(id.into(), doc);
    }

    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.collections
            .lock()
            .get(collection)
            .is_some_and(|c| c.contains_key(id))
    }
}

#[async_trait]
impl Db for FakeDb {
    async fn get_one(&self, collection: &str, id: &str) -> Result<Value, DbError> {
        self.collections
            .lock()
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned()
            .ok_or_else(|| DbError::NotFound {
                collection: collection.to_string(),
            })
    }

    async fn get_list(&self, collection: &str, filter: Value) -> Result<Vec<Value>, DbError> {
        Ok(self
            .collections
            .lock()
            .get(collection)
            .map(|c| c.values().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default())
    }

    async fn set_one(
        &self,
        collection: &str,
        id: &str,
        field_path: &str,
        value: Value,
    ) -> Result<(), DbError> {
        let mut collections = self.collections.lock();
        let doc = collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(|| DbError::NotFound {
                collection: collection.to_string(),
            })?;
        set_path(doc, field_path, value);
        Ok(())
    }

    async fn replace(&self, collection: &str, id: &str, doc: Value) -> Result<(), DbError> {
        self.collections
            .lock()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn del_one(&self, collection: &str, id: &str) -> Result<(), DbError> {
        self.collections
            .lock()
            .get_mut(collection)
            .and_then(|c| c.remove(id));
        Ok(())
    }

    async fn del_list(&self, collection: &str, filter: Value) -> Result<u64, DbError> {
        let mut collections = self.collections.lock();
        let Some(c) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let doomed: Vec<String> = c
            .iter()
            .filter(|(_, d)| matches(d, &filter))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &doomed {
            c.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
