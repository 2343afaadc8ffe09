//! `pilot --help` / `--version` output.

use crate::prelude::*;

#[test]
fn help_flag_shows_usage() {
    let output = pilot().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Usage:"), "stdout was: {stdout}");
    assert!(stdout.contains("--config"), "stdout was: {stdout}");
    assert!(stdout.contains("--token-file"), "stdout was: {stdout}");
}

#[test]
fn version_flag_shows_version() {
    let output = pilot().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("pilot"), "stdout was: {stdout}");
}

#[test]
fn unknown_flag_fails_with_nonzero_exit() {
    let output = pilot().arg("--does-not-exist").output().unwrap();
    assert!(!output.status.success());
}
