// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three host callbacks the core exposes (spec §6.3, §9: "set at
//! construction time, not re-registered dynamically — model as required
//! fields of a builder").

use async_trait::async_trait;
use pilot_core::{Issue, IssueResult};

/// The code-writing worker. The core treats this as a black box: given
/// an issue, it produces code changes and optionally a pull request.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, issue: &Issue) -> Result<IssueResult, String>;
}

/// Fired once per successful PR creation, before the merge wait begins.
#[derive(Debug, Clone)]
pub struct PrCreatedEvent {
    pub pr_number: u64,
    pub pr_url: String,
    pub issue_number: u64,
    pub head_sha: String,
    pub branch_name: String,
}

#[async_trait]
pub trait OnPrCreated: Send + Sync + 'static {
    async fn on_pr_created(&self, event: PrCreatedEvent);
}

/// Fired by the Cleaner after removing a stale `failed` label; the host
/// wires this to the Poller's `clear_processed` (spec §6.3).
#[async_trait]
pub trait OnFailedCleaned: Send + Sync + 'static {
    async fn on_failed_cleaned(&self, issue_number: u64);
}

/// Fired immediately before a handler invocation begins (SPEC_FULL.md
/// §4.3 supplement). The host wires this to `pilot-daemon`'s
/// `ExecutionIndex` so the Cleaner can tell a genuinely orphaned label
/// apart from one whose handler is still running in this process.
#[async_trait]
pub trait OnDispatchStarted: Send + Sync + 'static {
    async fn on_dispatch_started(&self, issue_number: u64);
}

/// Fired once a dispatched handler invocation has reached any outcome
/// (success, error, or terminal merge-wait state) — the `ExecutionIndex`
/// counterpart to [`OnDispatchStarted`].
#[async_trait]
pub trait OnDispatchFinished: Send + Sync + 'static {
    async fn on_dispatch_finished(&self, issue_number: u64);
}

/// Fired on each reserved-label transition (spec.md §2: "`BoardSync` is
/// invoked opportunistically on state transitions") so the host can move
/// a project-board card without the core depending on `pilot-board`
/// directly. `status_name` is one of `"in-progress"`, `"done"`, `"failed"`.
#[async_trait]
pub trait OnStatusChanged: Send + Sync + 'static {
    async fn on_status_changed(&self, issue_node_id: &str, status_name: &str);
}
