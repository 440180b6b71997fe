// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::FsError;
use crate::fs::{Fs, FsParams};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
pub struct FakeFs {
    root: String,
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeFs {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            files: Mutex::new(HashMap::new()),
        }
    }

    pub fn put(&self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.lock().insert(path.into(), contents.into());
    }
}

#[async_trait]
impl Fs for FakeFs {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError> {
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    fn get_params(&self) -> FsParams {
        FsParams {
            path: self.root.clone(),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
