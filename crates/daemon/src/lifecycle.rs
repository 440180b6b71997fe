// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup: wires the configured adapters into an `LcmContext`, enforcing the VCA
//! minimum-version gate before the dispatch loop and liveness prober are allowed to run.

use crate::config::Config;
use lcm_adapters::{LocalDb, LocalFs, LocalMsg, RoHttpClient, Vca, VcaHttpClient};
use lcm_core::SystemClock;
use lcm_engine::LcmContext;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("unsupported database driver {0:?}: only \"local\" ships a production backend")]
    UnsupportedDatabaseDriver(String),
    #[error("unsupported message driver {0:?}: only \"local\" ships a production backend")]
    UnsupportedMessageDriver(String),
    #[error("VCA advertised version {advertised} is below the required minimum {required}")]
    VcaVersionTooOld { advertised: String, required: String },
}

/// Parses a `major.minor.patch`-ish version into a comparable tuple, treating missing or
/// non-numeric components as `0` so comparisons never panic on an unexpected format.
fn parse_version(v: &str) -> (u64, u64, u64) {
    let mut parts = v.split('.').map(|p| p.parse::<u64>().unwrap_or(0));
    (parts.next().unwrap_or(0), parts.next().unwrap_or(0), parts.next().unwrap_or(0))
}

const MIN_VCA_VERSION: &str = "0.0.2";

fn check_vca_version(vca: &dyn Vca) -> Result<(), LifecycleError> {
    if parse_version(vca.version()) < parse_version(MIN_VCA_VERSION) {
        return Err(LifecycleError::VcaVersionTooOld {
            advertised: vca.version().to_string(),
            required: MIN_VCA_VERSION.to_string(),
        });
    }
    Ok(())
}

fn validate_drivers(config: &Config) -> Result<(), LifecycleError> {
    if config.database.driver != "local" {
        return Err(LifecycleError::UnsupportedDatabaseDriver(config.database.driver.clone()));
    }
    if config.message.driver != "local" {
        return Err(LifecycleError::UnsupportedMessageDriver(config.message.driver.clone()));
    }
    Ok(())
}

/// Builds the `LcmContext` the dispatch loop and liveness prober run against, and logs in to
/// VCA once up front (idempotent, matching spec.md's NS-instantiate fan-out convention).
pub async fn startup(config: &Config) -> Result<Arc<LcmContext>, LifecycleError> {
    validate_drivers(config)?;

    let db = Arc::new(LocalDb::new());
    let fs = Arc::new(LocalFs::new(config.storage.path.clone()));
    let msg = Arc::new(LocalMsg::new());
    let ro = Arc::new(RoHttpClient::new(config.ro.base_url(), config.ro.tenant.clone()));
    let vca = Arc::new(VcaHttpClient::new(config.vca.base_url()));

    check_vca_version(vca.as_ref())?;

    if let Err(e) = vca.login().await {
        tracing::warn!(error = %e, "initial VCA login failed, will retry lazily on first deploy");
    }

    Ok(Arc::new(LcmContext::new(db, fs, msg, ro, vca, Arc::new(SystemClock))))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
