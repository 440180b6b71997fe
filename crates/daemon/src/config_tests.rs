// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

const SAMPLE: &str = r#"
global:
  loglevel: debug
database:
  driver: local
storage:
  path: /app/storage
  folder: packages
  pkg-dir: package
RO:
  host: ro.internal
  port: 9090
VCA:
  host: vca.internal
  port: 17070
"#;

#[test]
fn loads_an_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lcm.cfg");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = Config::load(Some(&path), "lcmd").unwrap();

    assert_eq!(config.global.loglevel, "debug");
    assert_eq!(config.ro.host, "ro.internal");
    assert_eq!(config.ro.port, 9090);
    assert_eq!(config.vca.host, "vca.internal");
}

#[test]
fn missing_explicit_path_is_an_error() {
    let err = Config::load(Some(Path::new("/no/such/lcm.cfg")), "lcmd").unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn unparseable_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lcm.cfg");
    std::fs::write(&path, "not: valid: yaml: [").unwrap();

    let err = Config::load(Some(&path), "lcmd").unwrap_err();

    assert!(matches!(err, ConfigError::Parse(_, _)));
}

#[test]
#[serial]
fn an_lcm_env_var_overrides_the_ro_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lcm.cfg");
    std::fs::write(&path, SAMPLE).unwrap();
    std::env::set_var("LCM_RO_HOST", "override.internal");
    std::env::set_var("LCM_RO_PORT", "9999");

    let config = Config::load(Some(&path), "lcmd").unwrap();

    std::env::remove_var("LCM_RO_HOST");
    std::env::remove_var("LCM_RO_PORT");

    assert_eq!(config.ro.host, "override.internal");
    assert_eq!(config.ro.port, 9999);
}

#[test]
fn a_deeper_env_var_walks_nested_mapping_levels() {
    let mut tree = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());
    std::env::set_var("LCM_FOO_BAR_BAZ", "hello");

    apply_env_overrides(&mut tree);
    std::env::remove_var("LCM_FOO_BAR_BAZ");

    let foo = tree.get("foo").and_then(|v| v.get("bar")).and_then(|v| v.get("baz"));
    assert_eq!(foo, Some(&serde_yaml::Value::String("hello".to_string())));
}

#[test]
#[serial]
fn search_path_falls_back_through_progname_lcm_and_etc() {
    let dir = tempfile::tempdir().unwrap();
    let cwd = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    std::fs::write(dir.path().join("lcm.cfg"), SAMPLE).unwrap();

    let result = Config::load(None, "lcmd");

    std::env::set_current_dir(cwd).unwrap();

    let config = result.unwrap();
    assert_eq!(config.global.loglevel, "debug");
}
