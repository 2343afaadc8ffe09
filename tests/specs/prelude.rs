//! Test helpers for `pilot` black-box CLI specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use assert_cmd::Command;
use std::process::Output;

/// A `Command` for the compiled `pilot` binary with a clean environment —
/// `PILOT_GITHUB_TOKEN` is stripped so tests control token resolution
/// explicitly instead of inheriting whatever token is set for the
/// parent process.
#[allow(deprecated)] // cargo_bin is the documented way to locate workspace binaries
pub fn pilot() -> Command {
    let mut cmd = Command::cargo_bin("pilot").expect("pilot binary should be built by cargo test");
    cmd.env_remove("PILOT_GITHUB_TOKEN");
    cmd
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
