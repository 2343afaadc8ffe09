// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ephemeral result types passed between the poller, the handler, and the
//! merge waiter. Neither type is persisted — both are consumed within the
//! tick that produced them.

/// What the handler reported back for one dispatch (spec §3 `IssueResult`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueResult {
    pub success: bool,
    /// 0 means direct-commit (no PR was opened).
    pub pr_number: u64,
    pub pr_url: String,
    pub head_sha: String,
    pub branch_name: String,
    pub error: Option<String>,
}

impl IssueResult {
    pub fn is_direct_commit(&self) -> bool {
        self.success && self.pr_number == 0
    }
}

crate::builder! {
    pub struct IssueResultBuilder => IssueResult {
        set { success: bool = true }
        set { pr_number: u64 = 0 }
        into { pr_url: String = "", head_sha: String = "", branch_name: String = "" }
        option { error: String = None }
    }
}

/// Terminal-state snapshot of a pull request (spec §3 `MergeWaitResult`).
/// Invariant M1: exactly one of the four booleans is ever `true`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeWaitResult {
    pub merged: bool,
    pub closed: bool,
    pub conflicting: bool,
    pub timed_out: bool,
    pub pr_number: u64,
    pub pr_url: String,
    pub message: String,
}

impl MergeWaitResult {
    pub fn merged(pr_number: u64, pr_url: impl Into<String>) -> Self {
        Self { merged: true, pr_number, pr_url: pr_url.into(), ..Default::default() }
    }

    pub fn closed(pr_number: u64, pr_url: impl Into<String>) -> Self {
        Self { closed: true, pr_number, pr_url: pr_url.into(), ..Default::default() }
    }

    pub fn conflicting(pr_number: u64, pr_url: impl Into<String>) -> Self {
        Self { conflicting: true, pr_number, pr_url: pr_url.into(), ..Default::default() }
    }

    pub fn timed_out(pr_number: u64, pr_url: impl Into<String>) -> Self {
        Self { timed_out: true, pr_number, pr_url: pr_url.into(), ..Default::default() }
    }

    /// Invariant M1 check, asserted in tests against every code path that
    /// constructs a result outside the named constructors above.
    pub fn exactly_one_terminal_flag(&self) -> bool {
        [self.merged, self.closed, self.conflicting, self.timed_out]
            .iter()
            .filter(|b| **b)
            .count()
            == 1
    }
}

/// Snapshot of a pull request as reported by the tracker (spec §6.1
/// `GetPullRequest` output). `mergeable` is nullable: `None` means the
/// tracker has not yet computed mergeability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSnapshot {
    pub number: u64,
    pub url: String,
    pub state: PullRequestState,
    pub merged: bool,
    pub mergeable: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    Open,
    Closed,
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
