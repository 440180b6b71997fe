// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn args(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn no_arguments_means_search_the_default_path() {
    match parse_args(&args(&[])) {
        ArgsOutcome::Config(None) => {}
        _ => panic!("expected ArgsOutcome::Config(None)"),
    }
}

#[test]
fn dash_c_takes_the_following_path() {
    match parse_args(&args(&["-c", "/etc/osm/lcm.cfg"])) {
        ArgsOutcome::Config(Some(p)) => assert_eq!(p, PathBuf::from("/etc/osm/lcm.cfg")),
        _ => panic!("expected ArgsOutcome::Config(Some(..))"),
    }
}

#[test]
fn long_form_config_flag_is_equivalent() {
    match parse_args(&args(&["--config", "./lcm.cfg"])) {
        ArgsOutcome::Config(Some(p)) => assert_eq!(p, PathBuf::from("./lcm.cfg")),
        _ => panic!("expected ArgsOutcome::Config(Some(..))"),
    }
}

#[test]
fn dash_h_requests_help() {
    assert!(matches!(parse_args(&args(&["-h"])), ArgsOutcome::Help));
    assert!(matches!(parse_args(&args(&["--help"])), ArgsOutcome::Help));
}

#[test]
fn config_flag_without_a_path_is_an_error() {
    assert!(matches!(parse_args(&args(&["-c"])), ArgsOutcome::Error(_)));
}

#[test]
fn an_unrecognized_flag_is_an_error() {
    assert!(matches!(parse_args(&args(&["--bogus"])), ArgsOutcome::Error(_)));
}
