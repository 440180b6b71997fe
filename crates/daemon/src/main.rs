// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lcmd — the Lifecycle Coordinator daemon.
//!
//! Consumes lifecycle commands from the message bus and drives NS/VIM/SDN workflows against
//! RO and VCA. Runs the dispatch loop and the liveness prober as peer tasks until an
//! `admin/exit` bus command, a fatal bus error, or a termination signal.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

use lcm_daemon::Config;
use std::path::{Path, PathBuf};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let progname = args
        .first()
        .and_then(|a| Path::new(a).file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or("lcmd")
        .to_string();

    let config_path = match parse_args(&args[1..]) {
        ArgsOutcome::Help => {
            print_help();
            return Ok(());
        }
        ArgsOutcome::Config(path) => path,
        ArgsOutcome::Error(message) => {
            eprintln!("error: {message}");
            eprintln!("Usage: lcmd [-c|--config <file>] [-h|--help]");
            std::process::exit(1);
        }
    };

    let config = match Config::load(config_path.as_deref(), &progname) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let _log_guard = setup_logging(&config);
    info!("starting lcmd");

    let ctx = match lcm_daemon::startup(&config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = %e, "failed to start");
            std::process::exit(1);
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let mut dispatch_handle = tokio::spawn(lcm_engine::run_dispatch_loop(ctx.clone()));
    let mut prober_handle = tokio::spawn(lcm_engine::run_liveness_prober(ctx.clone()));

    let exit_code = tokio::select! {
        result = &mut dispatch_handle => {
            prober_handle.abort();
            match result {
                Ok(Ok(())) => { info!("dispatch loop exited cleanly"); 0 }
                Ok(Err(e)) => { error!(error = %e, "dispatch loop failed"); 1 }
                Err(e) => { error!(error = %e, "dispatch loop task panicked"); 1 }
            }
        }
        result = &mut prober_handle => {
            dispatch_handle.abort();
            match result {
                Ok(Ok(())) => { warn!("liveness prober exited without error (unexpected: it runs forever)"); 0 }
                Ok(Err(e)) => { error!(error = %e, "liveness prober failed"); 1 }
                Err(e) => { error!(error = %e, "liveness prober task panicked"); 1 }
            }
        }
        _ = sigterm.recv() => {
            info!("received SIGTERM, shutting down");
            dispatch_handle.abort();
            prober_handle.abort();
            0
        }
        _ = sigint.recv() => {
            info!("received SIGINT, shutting down");
            dispatch_handle.abort();
            prober_handle.abort();
            0
        }
    };

    info!("lcmd stopped");
    std::process::exit(exit_code);
}

enum ArgsOutcome {
    Help,
    Config(Option<PathBuf>),
    Error(String),
}

fn parse_args(args: &[String]) -> ArgsOutcome {
    let mut config_path = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return ArgsOutcome::Help,
            "-c" | "--config" => {
                i += 1;
                match args.get(i) {
                    Some(path) => config_path = Some(PathBuf::from(path)),
                    None => return ArgsOutcome::Error("-c/--config requires a file path".to_string()),
                }
            }
            other => return ArgsOutcome::Error(format!("unexpected argument '{other}'")),
        }
        i += 1;
    }
    ArgsOutcome::Config(config_path)
}

fn print_help() {
    println!("lcmd {}", env!("CARGO_PKG_VERSION"));
    println!("Lifecycle Coordinator daemon");
    println!();
    println!("USAGE:");
    println!("    lcmd [-c|--config <file>]");
    println!();
    println!("If no config file is given, lcmd searches ./{{progname}}.cfg, ./lcm.cfg,");
    println!("then /etc/osm/lcm.cfg, in that order.");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <file>    Path to the YAML configuration file");
    println!("    -h, --help             Print help information");
}

fn setup_logging(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.global.loglevel.clone()));

    match &config.global.logfile {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("lcm.log"));
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("warning: could not create log directory {}: {e}", dir.display());
            }
            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(non_blocking))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
            None
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
