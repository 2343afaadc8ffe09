//! Startup-time error reporting: config loading and token resolution both
//! happen before any tracker call, so these are exercisable without a
//! live GitHub API or worker process.

use crate::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn missing_config_file_reports_its_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nonexistent.toml");

    let output = pilot().args(["--config", missing.to_str().unwrap()]).output().unwrap();

    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("nonexistent.toml"), "stderr was: {stderr}");
}

#[test]
fn malformed_config_reports_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pilot.toml");
    fs::write(&path, "owner = \"acme\"\nrepo = ").unwrap();

    let output = pilot().args(["--config", path.to_str().unwrap()]).output().unwrap();

    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("parse"), "stderr was: {stderr}");
}

#[test]
fn missing_token_reports_the_expected_env_var() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pilot.toml");
    fs::write(
        &path,
        r#"
        owner = "acme"
        repo = "widgets"
        handler_command = ["./worker.sh"]
        processed_store_path = "processed.json.zst"
        "#,
    )
    .unwrap();

    let output = pilot().args(["--config", path.to_str().unwrap()]).output().unwrap();

    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("PILOT_GITHUB_TOKEN"), "stderr was: {stderr}");
}
