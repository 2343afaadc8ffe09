// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pilot_core::Issue;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

fn write_script(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path.display().to_string()
}

fn issue() -> Issue {
    Issue::builder().number(7).build()
}

#[tokio::test]
async fn reports_success_from_worker_stdout() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "worker.sh",
        "#!/bin/sh\ncat >/dev/null\necho '{\"success\":true,\"pr_number\":12,\"pr_url\":\"https://example/pr/12\"}'\n",
    );

    let handler = ProcessHandler::new(vec![script]);
    let result = handler.handle(&issue()).await.unwrap();

    assert!(result.success);
    assert_eq!(result.pr_number, 12);
    assert_eq!(result.pr_url, "https://example/pr/12");
}

#[tokio::test]
async fn nonzero_exit_is_an_error() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "worker.sh", "#!/bin/sh\ncat >/dev/null\necho boom >&2\nexit 1\n");

    let handler = ProcessHandler::new(vec![script]);
    let err = handler.handle(&issue()).await.unwrap_err();

    assert!(err.contains("boom"), "error should surface stderr: {err}");
}

#[tokio::test]
async fn malformed_output_is_an_error() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "worker.sh", "#!/bin/sh\ncat >/dev/null\necho 'not json'\n");

    let handler = ProcessHandler::new(vec![script]);
    let err = handler.handle(&issue()).await.unwrap_err();

    assert!(err.contains("parse"), "error should mention parsing: {err}");
}

#[tokio::test]
async fn empty_command_is_rejected() {
    let handler = ProcessHandler::new(vec![]);
    let err = handler.handle(&issue()).await.unwrap_err();
    assert!(err.contains("empty"));
}
