// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The document database collaborator. Documents are opaque `serde_json::Value`s — the core
//! only knows the tagged schemas in `lcm-core`; this trait just moves bytes.

use crate::error::DbError;
use async_trait::async_trait;
use serde_json::Value;

/// Two update styles mirror the original system's distinction between a full-document
/// replace and a targeted field set: `replace` overwrites the whole document (used when a
/// workflow has the entire in-memory record and wants to persist it atomically), `set_one`
/// patches a single dotted field path (e.g. `"_admin.operationalState"`, used by the VCA
/// callback aggregator so a status push never clobbers fields a concurrent workflow wrote).
#[async_trait]
pub trait Db: Send + Sync {
    async fn get_one(&self, collection: &str, id: &str) -> Result<Value, DbError>;
    async fn get_list(&self, collection: &str, filter: Value) -> Result<Vec<Value>, DbError>;
    async fn set_one(&self, collection: &str, id: &str, field_path: &str, value: Value)
        -> Result<(), DbError>;
    async fn replace(&self, collection: &str, id: &str, doc: Value) -> Result<(), DbError>;
    async fn del_one(&self, collection: &str, id: &str) -> Result<(), DbError>;
    async fn del_list(&self, collection: &str, filter: Value) -> Result<u64, DbError>;
}

pub mod fake;
pub mod local;
