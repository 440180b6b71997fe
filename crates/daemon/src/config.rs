// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loading: a YAML file with `global, database, storage, message, RO, VCA`
//! sections, overridable by `LCM_<SECTION>_<KEY>` environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("no config file found in the default search path")]
    NotFoundInSearchPath,
    #[error("failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub loglevel: String,
    pub logfile: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self { loglevel: "info".to_string(), logfile: None }
    }
}

/// `database`/`message` share this shape: `driver` selects the backend, the rest are
/// connection parameters passed to it. `"local"` is the only driver this rewrite ships a
/// production backend for; any other value is a startup error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub driver: String,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { driver: "local".to_string(), host: None, port: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root all package artifacts resolve under (`Fs::get_params().path`).
    pub path: String,
    pub folder: String,
    #[serde(rename = "pkg-dir")]
    pub pkg_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: "/app/storage".to_string(), folder: "packages".to_string(), pkg_dir: "package".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub tenant: String,
}

impl Default for RoConfig {
    fn default() -> Self {
        Self { scheme: "http".to_string(), host: "ro".to_string(), port: 9090, tenant: "osm".to_string() }
    }
}

impl RoConfig {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VcaConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Default for VcaConfig {
    fn default() -> Self {
        Self { scheme: "http".to_string(), host: "vca".to_string(), port: 17070 }
    }
}

impl VcaConfig {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    pub database: DriverConfig,
    pub storage: StorageConfig,
    pub message: DriverConfig,
    #[serde(rename = "RO")]
    pub ro: RoConfig,
    #[serde(rename = "VCA")]
    pub vca: VcaConfig,
}

const SEARCH_PATH: &[&str] = &["lcm.cfg"];

impl Config {
    /// Loads from `path` if given, else searches `./{progname}.cfg`, `./lcm.cfg`,
    /// `/etc/osm/lcm.cfg` in order.
    pub fn load(path: Option<&Path>, progname: &str) -> Result<Self, ConfigError> {
        let resolved = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                p.to_path_buf()
            }
            None => find_config(progname).ok_or(ConfigError::NotFoundInSearchPath)?,
        };

        let raw = std::fs::read_to_string(&resolved).map_err(|e| ConfigError::Read(resolved.clone(), e))?;
        let mut tree: serde_yaml::Value =
            serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse(resolved.clone(), e))?;
        if !tree.is_mapping() {
            tree = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());
        }
        apply_env_overrides(&mut tree);

        serde_yaml::from_value(tree).map_err(|e| ConfigError::Parse(resolved, e))
    }
}

fn find_config(progname: &str) -> Option<PathBuf> {
    let progname_cfg = format!("{progname}.cfg");
    let candidates: Vec<PathBuf> = std::iter::once(progname_cfg.as_str())
        .chain(SEARCH_PATH.iter().copied())
        .map(PathBuf::from)
        .chain(std::iter::once(PathBuf::from("/etc/osm/lcm.cfg")))
        .collect();
    candidates.into_iter().find(|p| p.exists())
}

/// `LCM_<SECTION>_<KEY>[_<SUBKEY>...]` overrides the config tree. `ro`/`vca` sections are
/// upper-cased to match the YAML section keys (`RO`, `VCA`); a trailing `port` segment is
/// coerced to an integer. Each underscore-delimited segment after the section walks one more
/// level of nested mapping, creating intermediate mappings as needed, so a two-segment
/// variable like `LCM_RO_HOST` sets a flat key while a deeper one like `LCM_FOO_BAR_BAZ` would
/// reach into `foo.bar.baz`.
fn apply_env_overrides(tree: &mut serde_yaml::Value) {
    let serde_yaml::Value::Mapping(root) = tree else {
        return;
    };

    for (name, value) in std::env::vars() {
        let Some(rest) = name.strip_prefix("LCM_") else {
            continue;
        };
        let mut segments = rest.split('_');
        let Some(section) = segments.next() else {
            continue;
        };
        let path: Vec<String> = segments.map(str::to_lowercase).collect();
        let Some((leaf, ancestors)) = path.split_last() else {
            continue;
        };

        let section_lower = section.to_lowercase();
        let section_key = if section_lower == "ro" || section_lower == "vca" {
            section_lower.to_uppercase()
        } else {
            section_lower
        };

        let mut map = root;
        for segment in std::iter::once(&section_key).chain(ancestors) {
            let entry = map
                .entry(serde_yaml::Value::String(segment.clone()))
                .or_insert_with(|| serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
            if !entry.is_mapping() {
                *entry = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());
            }
            let serde_yaml::Value::Mapping(nested) = entry else {
                unreachable!("just coerced to a mapping above")
            };
            map = nested;
        }

        let coerced = if leaf == "port" {
            value
                .parse::<i64>()
                .map(serde_yaml::Value::from)
                .unwrap_or_else(|_| serde_yaml::Value::String(value))
        } else {
            serde_yaml::Value::String(value)
        };
        map.insert(serde_yaml::Value::String(leaf.clone()), coerced);
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
