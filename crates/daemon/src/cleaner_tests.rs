// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::execution_index::InProcessExecutionIndex;
use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use pilot_core::Issue;
use pilot_tracker::FakeTracker;
use std::sync::Arc;

fn config() -> CleanerConfig {
    CleanerConfig {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        interval: Duration::from_secs(60),
        in_progress_threshold: Duration::from_secs(60 * 60),
        failed_threshold: Duration::from_secs(24 * 60 * 60),
    }
}

#[derive(Default)]
struct RecordingFailedCleaned {
    calls: parking_lot::Mutex<Vec<u64>>,
}

#[async_trait]
impl OnFailedCleaned for RecordingFailedCleaned {
    async fn on_failed_cleaned(&self, issue_number: u64) {
        self.calls.lock().push(issue_number);
    }
}

/// Scenario 5 (spec §8): stale `in-progress` with no active execution
/// and past the threshold is reaped, with a cleanup comment posted.
#[tokio::test]
async fn reaps_stale_in_progress_not_in_execution_index() {
    let tracker = FakeTracker::new();
    let now = Utc::now();
    tracker.seed_issue(
        Issue::builder()
            .number(33)
            .label("pilot")
            .label(pilot_core::IN_PROGRESS)
            .updated_at(now - ChronoDuration::minutes(90))
            .build(),
    );

    let index = Arc::new(InProcessExecutionIndex::new());
    let cleaner = Cleaner::with_clock(
        Arc::new(tracker.clone()),
        index,
        config(),
        FixedDateTimeSource(now),
    );

    let report = cleaner.sweep().await;
    assert_eq!(report.in_progress_cleaned, 1);

    let issue = tracker.issue(33).expect("issue still present");
    assert!(!issue.has_label(pilot_core::IN_PROGRESS));
    assert!(tracker.calls().iter().any(|c| matches!(c, pilot_tracker::RecordedCall::AddComment(33, _))));
}

#[tokio::test]
async fn skips_in_progress_issue_with_active_execution() {
    let tracker = FakeTracker::new();
    let now = Utc::now();
    tracker.seed_issue(
        Issue::builder()
            .number(33)
            .label("pilot")
            .label(pilot_core::IN_PROGRESS)
            .updated_at(now - ChronoDuration::minutes(90))
            .build(),
    );

    let index = Arc::new(InProcessExecutionIndex::new());
    index.on_dispatch_started(33).await;

    let cleaner = Cleaner::with_clock(Arc::new(tracker.clone()), index, config(), FixedDateTimeSource(now));
    let report = cleaner.sweep().await;

    assert_eq!(report.in_progress_cleaned, 0);
    assert!(tracker.issue(33).unwrap().has_label(pilot_core::IN_PROGRESS));
}

#[tokio::test]
async fn skips_issue_under_threshold() {
    let tracker = FakeTracker::new();
    let now = Utc::now();
    tracker.seed_issue(
        Issue::builder()
            .number(33)
            .label("pilot")
            .label(pilot_core::IN_PROGRESS)
            .updated_at(now - ChronoDuration::minutes(5))
            .build(),
    );

    let index = Arc::new(InProcessExecutionIndex::new());
    let cleaner = Cleaner::with_clock(Arc::new(tracker.clone()), index, config(), FixedDateTimeSource(now));
    let report = cleaner.sweep().await;

    assert_eq!(report.in_progress_cleaned, 0);
}

#[tokio::test]
async fn cleaning_failed_label_invokes_callback() {
    let tracker = FakeTracker::new();
    let now = Utc::now();
    tracker.seed_issue(
        Issue::builder()
            .number(44)
            .label("pilot")
            .label(pilot_core::FAILED)
            .updated_at(now - ChronoDuration::hours(30))
            .build(),
    );

    let index = Arc::new(InProcessExecutionIndex::new());
    let recorder = Arc::new(RecordingFailedCleaned::default());
    let cleaner = Cleaner::with_clock(Arc::new(tracker.clone()), index, config(), FixedDateTimeSource(now))
        .on_failed_cleaned(recorder.clone());

    let report = cleaner.sweep().await;
    assert_eq!(report.failed_cleaned, 1);
    assert_eq!(recorder.calls.lock().clone(), vec![44]);
}

#[tokio::test]
async fn removing_absent_label_is_idempotent() {
    let tracker = FakeTracker::new();
    let now = Utc::now();
    // No issues seeded at all: the sweep should simply find nothing.
    let index = Arc::new(InProcessExecutionIndex::new());
    let cleaner = Cleaner::with_clock(Arc::new(tracker), index, config(), FixedDateTimeSource(now));
    let report = cleaner.sweep().await;
    assert_eq!(report, SweepReport::default());
}

#[tokio::test]
async fn starting_twice_returns_already_started() {
    let tracker = FakeTracker::new();
    let now = Utc::now();
    let index = Arc::new(InProcessExecutionIndex::new());
    let cleaner =
        Arc::new(Cleaner::with_clock(Arc::new(tracker), index, config(), FixedDateTimeSource(now)));

    cleaner.start().await.unwrap();
    let err = cleaner.start().await.unwrap_err();
    assert!(matches!(err, crate::error::CleanerError::AlreadyStarted));

    cleaner.stop();
}
