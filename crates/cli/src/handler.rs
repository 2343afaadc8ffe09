// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The code-writing worker is out of scope (SPEC_FULL.md Non-goals), but the
//! [`pilot_engine::Handler`] seam still needs one concrete implementation to
//! produce a runnable binary. `ProcessHandler` spawns the operator-configured
//! command, feeds it the issue as JSON on stdin, and expects a single JSON
//! object back on stdout describing the outcome.

use async_trait::async_trait;
use pilot_core::{Issue, IssueResult};
use pilot_engine::Handler;
use serde::Deserialize;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Invokes `command[0] command[1..] <issue JSON on stdin>` and parses the
/// worker's stdout as a [`WorkerReport`].
pub struct ProcessHandler {
    command: Vec<String>,
}

impl ProcessHandler {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

#[derive(Debug, Deserialize)]
struct WorkerReport {
    success: bool,
    #[serde(default)]
    pr_number: u64,
    #[serde(default)]
    pr_url: String,
    #[serde(default)]
    head_sha: String,
    #[serde(default)]
    branch_name: String,
    #[serde(default)]
    error: Option<String>,
}

impl From<WorkerReport> for IssueResult {
    fn from(report: WorkerReport) -> Self {
        IssueResult {
            success: report.success,
            pr_number: report.pr_number,
            pr_url: report.pr_url,
            head_sha: report.head_sha,
            branch_name: report.branch_name,
            error: report.error,
        }
    }
}

#[async_trait]
impl Handler for ProcessHandler {
    async fn handle(&self, issue: &Issue) -> Result<IssueResult, String> {
        let (program, args) =
            self.command.split_first().ok_or_else(|| "handler_command is empty".to_string())?;

        let payload = serde_json::to_vec(issue).map_err(|e| format!("failed to encode issue: {e}"))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("failed to spawn handler command: {e}"))?;

        let mut stdin = child.stdin.take().ok_or_else(|| "handler process has no stdin".to_string())?;
        stdin.write_all(&payload).await.map_err(|e| format!("failed to write issue to handler stdin: {e}"))?;
        drop(stdin);

        let output = child.wait_with_output().await.map_err(|e| format!("handler process failed: {e}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("handler exited with {}: {}", output.status, stderr.trim()));
        }

        let report: WorkerReport = serde_json::from_slice(&output.stdout)
            .map_err(|e| format!("failed to parse handler output: {e}"))?;
        Ok(report.into())
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
