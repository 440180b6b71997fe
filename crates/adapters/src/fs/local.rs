// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The production `Fs` driver: reads package artifacts off local disk, rooted at a configured
//! storage path.

use crate::error::FsError;
use crate::fs::{Fs, FsParams};
use async_trait::async_trait;
use std::path::Path;

pub struct LocalFs {
    root: String,
}

impl LocalFs {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Fs for LocalFs {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let full = Path::new(&self.root).join(path);
        tokio::fs::read(&full).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FsError::NotFound(full.display().to_string())
            } else {
                FsError::Backend(e.to_string())
            }
        })
    }

    fn get_params(&self) -> FsParams {
        FsParams { path: self.root.clone() }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
