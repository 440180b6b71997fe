// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nslcmops` — NS lifecycle-operation command records.

use crate::id::{NslcmOpId, NsrId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LcmOperationType {
    Instantiate,
    Terminate,
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationState {
    #[serde(rename = "PROCESSING")]
    Processing,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "FAILED_TEMP")]
    FailedTemp,
    #[serde(rename = "FAILED")]
    Failed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoremove: Option<bool>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NsLcmOp {
    #[serde(rename = "_id")]
    pub id: NslcmOpId,
    #[serde(rename = "nsInstanceId")]
    pub ns_instance_id: NsrId,
    #[serde(rename = "lcmOperationType")]
    pub lcm_operation_type: LcmOperationType,
    #[serde(rename = "operationParams", default)]
    pub operation_params: OperationParams,
    #[serde(rename = "operationState")]
    pub operation_state: OperationState,
    #[serde(rename = "detailed-status", default)]
    pub detailed_status: String,
    #[serde(rename = "statusEnteredTime")]
    pub status_entered_time: DateTime<Utc>,
}
