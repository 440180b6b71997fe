// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The VCA engine collaborator: a thin wrapper over the charm deployment service that
//! configures VNFs post-deployment.

use crate::error::VcaError;
use async_trait::async_trait;
use lcm_core::Vnfd;
use serde_json::Value;

#[async_trait]
pub trait Vca: Send + Sync {
    /// Idempotent: safe to call once per process before fanning out deploys.
    async fn login(&self) -> Result<(), VcaError>;

    fn format_application_name(&self, ns_name: &str, vnf_index: &str, vnfd_name: &str) -> String;

    async fn deploy_charms(
        &self,
        model: &str,
        application: &str,
        vnfd: &Vnfd,
        charm_path: &str,
        params: Value,
    ) -> Result<(), VcaError>;

    async fn remove_charms(&self, model: &str, application: &str) -> Result<(), VcaError>;

    async fn execute_primitive(
        &self,
        model: &str,
        application: &str,
        primitive: &str,
        params: Value,
    ) -> Result<(), VcaError>;

    /// Advertised VCA version; the daemon refuses to start below `0.0.2`.
    fn version(&self) -> &str;
}

pub mod fake;
pub mod http;
