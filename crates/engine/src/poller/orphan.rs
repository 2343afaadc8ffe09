// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orphan recovery (spec §4.1.1), run once at Start before the dispatch
//! loop begins. A crashed prior process can leave `in-progress` on an
//! issue with no handler actually running for it; this sweep strips
//! those stale markers so the issue is eligible again.

use pilot_core::{labels, ListIssuesQuery, TrackerPort};
use tracing::warn;

pub async fn recover(tracker: &dyn TrackerPort, owner: &str, repo: &str, work_ready_label: &str) {
    let query = ListIssuesQuery { labels: vec![work_ready_label.to_string(), labels::IN_PROGRESS.to_string()], open_only: true };

    let orphans = match tracker.list_issues(owner, repo, &query).await {
        Ok(issues) => issues,
        Err(e) => {
            warn!(error = %e, "orphan recovery: list_issues failed, skipping this run's sweep");
            return;
        }
    };

    for issue in orphans {
        if let Err(e) = tracker.remove_label(owner, repo, issue.number, labels::IN_PROGRESS).await {
            warn!(issue = issue.number, error = %e, "orphan recovery: failed to strip in-progress, leaving to the reaper");
        }
    }
}

#[cfg(test)]
#[path = "orphan_tests.rs"]
mod tests;
