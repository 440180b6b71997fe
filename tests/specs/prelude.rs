//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Locates the `lcmd` binary relative to this test binary, rather than via
/// `assert_cmd::cargo_bin` (which only resolves binaries Cargo considers part of the
/// current package): `lcmd` lives in a sibling workspace member.
fn lcmd_binary() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug/lcmd");
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("lcmd");
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// A builder for an `lcmd` invocation in an empty temp directory, so `./lcm.cfg` and
/// `./{progname}.cfg` never resolve to a file left behind by the host running the tests.
pub struct LcmdBuilder {
    args: Vec<String>,
    dir: PathBuf,
}

pub fn lcmd(dir: &Path) -> LcmdBuilder {
    LcmdBuilder { args: Vec::new(), dir: dir.to_path_buf() }
}

impl LcmdBuilder {
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(lcmd_binary());
        cmd.args(&self.args);
        cmd.current_dir(&self.dir);
        cmd
    }

    pub fn passes(self) -> RunAssert {
        let output = self.command().output().expect("lcmd should run");
        assert!(
            output.status.success(),
            "expected lcmd to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn fails(self) -> RunAssert {
        let output = self.command().output().expect("lcmd should run");
        assert!(
            !output.status.success(),
            "expected lcmd to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{expected}'\nstdout: {stdout}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain '{expected}'\nstderr: {stderr}");
        self
    }
}

pub fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir should be creatable")
}
