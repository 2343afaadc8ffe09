// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-PR terminal-state polling (spec §4.2). Grounded on this stack's
//! PR-lifecycle poll loop: a ticking interval, a synchronous initial
//! check before the first tick, and a cancellation-aware wait between
//! fetches.

use crate::error::MergeWaitError;
use pilot_core::{MergeWaitResult, TrackerPort};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Invoked with the latest PR snapshot on every fetch, terminal or not,
/// for progress reporting (spec §4.2).
pub trait OnPollCallback: Send + Sync + 'static {
    fn on_poll(&self, result: &MergeWaitResult);
}

pub struct MergeWaiter<T: TrackerPort + ?Sized> {
    tracker: Arc<T>,
    owner: String,
    repo: String,
    poll_interval: Duration,
    timeout: Duration,
}

impl<T: TrackerPort + ?Sized> MergeWaiter<T> {
    pub fn new(
        tracker: Arc<T>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self { tracker, owner: owner.into(), repo: repo.into(), poll_interval, timeout }
    }

    /// Blocks until `pr_number` reaches a terminal state, the timeout
    /// elapses, or `cancel` fires.
    ///
    /// M1: the returned result has exactly one terminal flag set, except
    /// on cancellation, which returns `Err` with no result at all — the
    /// caller must not treat a cancelled wait as any terminal outcome.
    /// M2: on `TimedOut`, marking the issue processed is the caller's
    /// responsibility, not this function's. M3: this function never
    /// mutates the PR.
    pub async fn wait(
        &self,
        pr_number: u64,
        cancel: &CancellationToken,
        on_poll: Option<&dyn OnPollCallback>,
    ) -> Result<MergeWaitResult, MergeWaitError> {
        let deadline = Instant::now() + self.timeout;

        // Initial synchronous check: a fetch error here is fatal (spec §4.2).
        let snapshot = self.tracker.get_pull_request(&self.owner, &self.repo, pr_number).await?;
        if let Some(result) = terminal_result(&snapshot, pr_number) {
            if let Some(cb) = on_poll {
                cb.on_poll(&result);
            }
            return Ok(result);
        }

        loop {
            if Instant::now() >= deadline {
                let result = MergeWaitResult::timed_out(pr_number, snapshot.url.clone());
                if let Some(cb) = on_poll {
                    cb.on_poll(&result);
                }
                return Ok(result);
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(MergeWaitError::Cancelled);
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }

            match self.tracker.get_pull_request(&self.owner, &self.repo, pr_number).await {
                Ok(snapshot) => {
                    if let Some(result) = terminal_result(&snapshot, pr_number) {
                        if let Some(cb) = on_poll {
                            cb.on_poll(&result);
                        }
                        return Ok(result);
                    }
                    let non_terminal = MergeWaitResult {
                        pr_number,
                        pr_url: snapshot.url.clone(),
                        ..Default::default()
                    };
                    if let Some(cb) = on_poll {
                        cb.on_poll(&non_terminal);
                    }
                }
                Err(e) => {
                    // Transient fetch errors inside the loop are logged and
                    // treated as "keep polling" (spec §4.2).
                    warn!(pr_number, error = %e, "merge wait poll failed, retrying");
                }
            }
        }
    }
}

fn terminal_result(
    snapshot: &pilot_core::PullRequestSnapshot,
    pr_number: u64,
) -> Option<MergeWaitResult> {
    use pilot_core::PullRequestState;

    if snapshot.merged {
        return Some(MergeWaitResult::merged(pr_number, snapshot.url.clone()));
    }
    if snapshot.state == PullRequestState::Closed && !snapshot.merged {
        return Some(MergeWaitResult::closed(pr_number, snapshot.url.clone()));
    }
    if snapshot.mergeable == Some(false) {
        return Some(MergeWaitResult::conflicting(pr_number, snapshot.url.clone()));
    }
    None
}

#[cfg(test)]
#[path = "merge_waiter_tests.rs"]
mod tests;
