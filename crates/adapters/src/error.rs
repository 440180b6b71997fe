// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds surfaced by each external collaborator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("document not found in {collection}")]
    NotFound { collection: String },
    #[error("database backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum FsError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("filesystem backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum MsgError {
    #[error("bus read error: {0}")]
    Read(String),
    #[error("bus write error: {0}")]
    Write(String),
    #[error("bus message could not be deserialized: {0}")]
    Deserialize(String),
}

/// Errors from the RO HTTP client. `NotFound`/`Conflict` are surfaced distinctly from other
/// transport failures because several workflows (`vim_delete`, `sdn_delete`, the NS poll loop)
/// branch on exactly these two status codes.
#[derive(Debug, Error)]
pub enum RoError {
    #[error("RO resource not found")]
    NotFound,
    #[error("RO resource conflict")]
    Conflict,
    #[error("RO request failed: {0}")]
    Http(String),
    #[error("RO response could not be decoded: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum VcaError {
    #[error("VCA request failed: {0}")]
    Http(String),
    #[error("VCA session is not authenticated")]
    NotLoggedIn,
}
