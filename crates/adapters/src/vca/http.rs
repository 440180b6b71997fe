// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The production `Vca` implementation: a `reqwest` client over the charm deployment service.

use crate::error::VcaError;
use crate::vca::Vca;
use async_trait::async_trait;
use lcm_core::Vnfd;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::RwLock;

/// Version of the charm-deployment wire protocol this client speaks, the Rust analogue of the
/// installed N2VC library's own `__version__` the original gates startup against. Bump this when
/// `post`'s request/response shapes change; it is never configuration.
const PROTOCOL_VERSION: &str = "0.0.2";

pub struct VcaHttpClient {
    client: Client,
    base_url: String,
    logged_in: RwLock<bool>,
}

impl VcaHttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            logged_in: RwLock::new(false),
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<(), VcaError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .map_err(|e| VcaError::Http(e.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            tracing::warn!(path, %status, "VCA request failed");
            Err(VcaError::Http(format!("VCA returned {status}")))
        }
    }
}

#[async_trait]
impl Vca for VcaHttpClient {
    async fn login(&self) -> Result<(), VcaError> {
        if *self.logged_in.read().await {
            return Ok(());
        }
        self.post("/login", json!({})).await?;
        *self.logged_in.write().await = true;
        Ok(())
    }

    fn format_application_name(&self, ns_name: &str, vnf_index: &str, vnfd_name: &str) -> String {
        format!("{ns_name}-{vnf_index}-{vnfd_name}")
            .to_lowercase()
            .replace(['_', '.'], "-")
    }

    async fn deploy_charms(
        &self,
        model: &str,
        application: &str,
        vnfd: &Vnfd,
        charm_path: &str,
        params: Value,
    ) -> Result<(), VcaError> {
        if !*self.logged_in.read().await {
            return Err(VcaError::NotLoggedIn);
        }
        self.post(
            "/deploy",
            json!({
                "model": model,
                "application": application,
                "vnfd_id": vnfd.id.as_str(),
                "charm_path": charm_path,
                "params": params,
            }),
        )
        .await
    }

    async fn remove_charms(&self, model: &str, application: &str) -> Result<(), VcaError> {
        self.post("/remove", json!({"model": model, "application": application}))
            .await
    }

    async fn execute_primitive(
        &self,
        model: &str,
        application: &str,
        primitive: &str,
        params: Value,
    ) -> Result<(), VcaError> {
        self.post(
            "/execute_primitive",
            json!({
                "model": model,
                "application": application,
                "primitive": primitive,
                "params": params,
            }),
        )
        .await
    }

    fn version(&self) -> &str {
        PROTOCOL_VERSION
    }
}
