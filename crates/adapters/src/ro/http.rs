// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The production `Ro` implementation: a `reqwest` client bound to RO's base URL.

use crate::error::RoError;
use crate::ro::{default_check_ns_status, NsRoState, Ro, VnfInfo};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Clone)]
pub struct RoHttpClient {
    client: Client,
    base_url: String,
    tenant: String,
}

impl RoHttpClient {
    pub fn new(base_url: impl Into<String>, tenant: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            tenant: tenant.into(),
        }
    }

    fn url(&self, kind: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/ro/{}/{}/{}", self.base_url, self.tenant, kind, id),
            None => format!("{}/ro/{}/{}", self.base_url, self.tenant, kind),
        }
    }

    async fn classify(resp: reqwest::Response) -> Result<Value, RoError> {
        match resp.status() {
            StatusCode::NOT_FOUND => Err(RoError::NotFound),
            StatusCode::CONFLICT => Err(RoError::Conflict),
            status if status.is_success() => {
                Ok(resp.json::<Value>().await.unwrap_or(Value::Null))
            }
            status => Err(RoError::Http(format!("RO returned {status}"))),
        }
    }
}

#[async_trait]
impl Ro for RoHttpClient {
    async fn create(&self, kind: &str, descriptor: Value) -> Result<Value, RoError> {
        let resp = self
            .client
            .post(self.url(kind, None))
            .json(&descriptor)
            .send()
            .await
            .map_err(|e| RoError::Http(e.to_string()))?;
        Self::classify(resp).await
    }

    async fn edit(&self, kind: &str, id: &str, descriptor: Value) -> Result<(), RoError> {
        let resp = self
            .client
            .put(self.url(kind, Some(id)))
            .json(&descriptor)
            .send()
            .await
            .map_err(|e| RoError::Http(e.to_string()))?;
        Self::classify(resp).await.map(drop)
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<(), RoError> {
        let resp = self
            .client
            .delete(self.url(kind, Some(id)))
            .send()
            .await
            .map_err(|e| RoError::Http(e.to_string()))?;
        Self::classify(resp).await.map(drop)
    }

    async fn show(&self, kind: &str, id: &str) -> Result<Value, RoError> {
        let resp = self
            .client
            .get(self.url(kind, Some(id)))
            .send()
            .await
            .map_err(|e| RoError::Http(e.to_string()))?;
        Self::classify(resp).await
    }

    async fn get_list(&self, kind: &str, filter_by: Value) -> Result<Vec<Value>, RoError> {
        let resp = self
            .client
            .get(self.url(kind, None))
            .query(&filter_by)
            .send()
            .await
            .map_err(|e| RoError::Http(e.to_string()))?;
        let body = Self::classify(resp).await?;
        Ok(body.as_array().cloned().unwrap_or_default())
    }

    async fn attach_datacenter(&self, id: &str, descriptor: Value) -> Result<(), RoError> {
        let resp = self
            .client
            .post(format!("{}/datacenters", self.url("vim", Some(id))))
            .json(&descriptor)
            .send()
            .await
            .map_err(|e| RoError::Http(e.to_string()))?;
        Self::classify(resp).await.map(drop)
    }

    async fn detach_datacenter(&self, id: &str) -> Result<(), RoError> {
        let resp = self
            .client
            .delete(format!("{}/datacenters", self.url("vim", Some(id))))
            .send()
            .await
            .map_err(|e| RoError::Http(e.to_string()))?;
        Self::classify(resp).await.map(drop)
    }

    fn check_ns_status(&self, desc: &Value) -> (NsRoState, String) {
        default_check_ns_status(desc)
    }

    async fn get_ns_vnf_info(&self, desc: &Value) -> Result<HashMap<String, VnfInfo>, RoError> {
        let nsr_id = desc
            .get("uuid")
            .and_then(Value::as_str)
            .ok_or_else(|| RoError::Http("ns descriptor missing uuid".to_string()))?;
        let resp = self
            .client
            .get(format!("{}/vnf_info", self.url("ns", Some(nsr_id))))
            .send()
            .await
            .map_err(|e| RoError::Http(e.to_string()))?;
        let body = Self::classify(resp).await?;
        serde_json::from_value(body).map_err(RoError::Deserialize)
    }
}
