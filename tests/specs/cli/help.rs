//! CLI help and argument-parsing specs.

use crate::prelude::*;

#[test]
fn dash_h_prints_usage_and_exits_zero() {
    let dir = tempdir();
    lcmd(dir.path()).arg("-h").passes().stdout_has("USAGE:");
}

#[test]
fn long_form_help_prints_usage_and_exits_zero() {
    let dir = tempdir();
    lcmd(dir.path()).arg("--help").passes().stdout_has("Lifecycle Coordinator daemon");
}

#[test]
fn unrecognized_flag_exits_nonzero_with_usage_on_stderr() {
    let dir = tempdir();
    lcmd(dir.path()).arg("--bogus").fails().stderr_has("unexpected argument");
}

#[test]
fn config_flag_without_a_path_exits_nonzero() {
    let dir = tempdir();
    lcmd(dir.path()).arg("-c").fails().stderr_has("requires a file path");
}
