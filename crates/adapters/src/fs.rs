// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The object-blob filesystem collaborator: resolves `cloud-init-file` contents and charm
//! package paths relative to a configured storage root.

use crate::error::FsError;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct FsParams {
    /// Root path package artifacts (cloud-init files, charms) are resolved under.
    pub path: String,
}

#[async_trait]
pub trait Fs: Send + Sync {
    /// Reads the full contents of `path` (relative to `get_params().path`).
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError>;
    fn get_params(&self) -> FsParams;
}

pub mod fake;
pub mod local;
