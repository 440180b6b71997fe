// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The workflow error type every phase of every workflow ultimately produces.

use lcm_adapters::{DbError, FsError, RoError, VcaError};
use thiserror::Error;

/// Mirrors the single `LcmException` the source raises for every validation failure
/// (VIM not ENABLED, SDN not deployed, charm not active, wrong state for an action, …),
/// plus the propagated errors from each collaborator.
#[derive(Debug, Error)]
pub enum LcmError {
    #[error("{0}")]
    Validation(String),
    #[error("RO error: {0}")]
    Ro(#[from] RoError),
    #[error("database error: {0}")]
    Db(#[from] DbError),
    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),
    #[error("VCA error: {0}")]
    Vca(#[from] VcaError),
    #[error("timeout: {0}")]
    Timeout(String),
}
