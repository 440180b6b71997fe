// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::VcaError;
use crate::vca::Vca;
use async_trait::async_trait;
use lcm_core::Vnfd;
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum VcaCall {
    Deploy { application: String, charm_path: String },
    Remove { application: String },
    ExecutePrimitive { application: String, primitive: String },
}

pub struct FakeVca {
    version: String,
    calls: Mutex<Vec<VcaCall>>,
    /// Applications that `deploy_charms`/`remove_charms`/`execute_primitive` should fail for.
    fail_for: Mutex<Vec<String>>,
}

impl Default for FakeVca {
    fn default() -> Self {
        Self::new("0.0.2")
    }
}

impl FakeVca {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            calls: Mutex::new(Vec::new()),
            fail_for: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_for(&self, application: impl Into<String>) {
        self.fail_for.lock().push(application.into());
    }

    pub fn calls(&self) -> Vec<VcaCall> {
        self.calls.lock().clone()
    }

    fn should_fail(&self, application: &str) -> bool {
        self.fail_for.lock().iter().any(|a| a == application)
    }
}

#[async_trait]
impl Vca for FakeVca {
    async fn login(&self) -> Result<(), VcaError> {
        Ok(())
    }

    fn format_application_name(&self, ns_name: &str, vnf_index: &str, vnfd_name: &str) -> String {
        format!("{ns_name}-{vnf_index}-{vnfd_name}")
    }

    async fn deploy_charms(
        &self,
        _model: &str,
        application: &str,
        _vnfd: &Vnfd,
        charm_path: &str,
        _params: Value,
    ) -> Result<(), VcaError> {
        self.calls.lock().push(VcaCall::Deploy {
            application: application.to_string(),
            charm_path: charm_path.to_string(),
        });
        if self.should_fail(application) {
            Err(VcaError::Http("deploy failed".to_string()))
        } else {
            Ok(())
        }
    }

    async fn remove_charms(&self, _model: &str, application: &str) -> Result<(), VcaError> {
        self.calls.lock().push(VcaCall::Remove {
            application: application.to_string(),
        });
        if self.should_fail(application) {
            Err(VcaError::Http("remove failed".to_string()))
        } else {
            Ok(())
        }
    }

    async fn execute_primitive(
        &self,
        _model: &str,
        application: &str,
        primitive: &str,
        _params: Value,
    ) -> Result<(), VcaError> {
        self.calls.lock().push(VcaCall::ExecutePrimitive {
            application: application.to_string(),
            primitive: primitive.to_string(),
        });
        if self.should_fail(application) {
            Err(VcaError::Http("execute_primitive failed".to_string()))
        } else {
            Ok(())
        }
    }

    fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
