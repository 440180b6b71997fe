//! Config-loading failure specs: lcmd must fail fast with a clear message rather than
//! start against a missing or invalid configuration.

use crate::prelude::*;

#[test]
fn missing_config_file_on_the_search_path_exits_nonzero() {
    let dir = tempdir();
    lcmd(dir.path()).fails().stderr_has("error:");
}

#[test]
fn explicit_missing_config_path_is_reported_by_name() {
    let dir = tempdir();
    let missing = dir.path().join("does-not-exist.cfg");
    lcmd(dir.path())
        .arg("-c")
        .arg(missing.to_string_lossy().into_owned())
        .fails()
        .stderr_has("does-not-exist.cfg");
}

#[test]
fn a_config_file_with_an_unsupported_database_driver_is_rejected_at_startup() {
    let dir = tempdir();
    std::fs::write(dir.path().join("lcm.cfg"), "database:\n  driver: mongo\n").expect("config file should be writable");

    // Past the config-parsing stage, failures are reported through the tracing
    // subscriber (stdout by default) rather than a bare eprintln.
    lcmd(dir.path()).fails().stdout_has("mongo");
}

#[test]
fn malformed_yaml_is_reported_as_a_parse_error() {
    let dir = tempdir();
    std::fs::write(dir.path().join("lcm.cfg"), "global: [this is not a mapping\n").expect("config file should be writable");

    lcmd(dir.path()).fails().stderr_has("error:");
}
