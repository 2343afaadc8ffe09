// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pilot_core::{Issue, IssueState, ListIssuesQuery, PullRequestState};

#[tokio::test]
async fn list_issues_filters_by_label_and_open_state() {
    let tracker = FakeTracker::new();
    tracker.seed_issue(Issue::builder().number(1).label("pilot").build());
    tracker.seed_issue(
        Issue::builder().number(2).state(IssueState::Closed).label("pilot").build(),
    );

    let query = ListIssuesQuery::with_label("pilot");
    let issues = tracker.list_issues("o", "r", &query).await.unwrap();

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].number, 1);
}

#[tokio::test]
async fn add_labels_and_remove_label_mutate_the_seeded_issue() {
    let tracker = FakeTracker::new();
    tracker.seed_issue(Issue::builder().number(5).build());

    tracker.add_labels("o", "r", 5, &["in-progress".to_string()]).await.unwrap();
    assert!(tracker.issue(5).unwrap().has_label("in-progress"));

    tracker.remove_label("o", "r", 5, "IN-PROGRESS").await.unwrap();
    assert!(!tracker.issue(5).unwrap().has_label("in-progress"));
}

#[tokio::test]
async fn get_pull_request_returns_the_scripted_snapshot() {
    let tracker = FakeTracker::new();
    tracker.seed_pull_request(
        501,
        PullRequestSnapshot {
            number: 501,
            url: "https://example.com/pr/501".into(),
            state: PullRequestState::Open,
            merged: false,
            mergeable: None,
        },
    );

    let snapshot = tracker.get_pull_request("o", "r", 501).await.unwrap();
    assert_eq!(snapshot.number, 501);
    assert!(!snapshot.merged);
}

#[tokio::test]
async fn unscripted_pull_request_is_not_found() {
    let tracker = FakeTracker::new();
    let result = tracker.get_pull_request("o", "r", 999).await;
    assert!(matches!(result, Err(TrackerError::NotFound(_))));
}

#[tokio::test]
async fn calls_are_recorded_in_invocation_order() {
    let tracker = FakeTracker::new();
    tracker.seed_issue(Issue::builder().number(1).build());
    let _ = tracker.get_issue("o", "r", 1).await;
    let _ = tracker.add_comment("o", "r", 1, "hi").await;

    assert_eq!(
        tracker.calls(),
        vec![RecordedCall::GetIssue(1), RecordedCall::AddComment(1, "hi".to_string())]
    );
}
