// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pilot_core::Issue;
use pilot_tracker::{FakeTracker, RecordedCall};

#[tokio::test]
async fn strips_in_progress_from_orphaned_issues() {
    let tracker = FakeTracker::new();
    tracker.seed_issue(Issue::builder().number(12).label("pilot").label(labels::IN_PROGRESS).build());
    tracker.seed_issue(Issue::builder().number(13).label("pilot").build());

    recover(&tracker, "o", "r", "pilot").await;

    assert!(tracker.calls().contains(&RecordedCall::RemoveLabel(12, labels::IN_PROGRESS.to_string())));
    assert!(!tracker.calls().iter().any(|c| matches!(c, RecordedCall::RemoveLabel(13, _))));
}

#[tokio::test]
async fn empty_tracker_is_a_noop() {
    let tracker = FakeTracker::new();

    recover(&tracker, "o", "r", "pilot").await;

    assert!(tracker.calls().iter().any(|c| matches!(c, RecordedCall::ListIssues)));
    assert!(!tracker.calls().iter().any(|c| matches!(c, RecordedCall::RemoveLabel(..))));
}
