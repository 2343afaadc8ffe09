// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::cleaner::{CleanerConfig, FixedDateTimeSource};
use crate::execution_index::InProcessExecutionIndex;
use async_trait::async_trait;
use chrono::Utc;
use pilot_core::{Issue, IssueResult};
use pilot_engine::{Handler, OnFailedCleaned, OnPrCreated, PollerBuilder, PollerConfig, PrCreatedEvent};
use pilot_storage::InMemoryProcessedStore;
use pilot_tracker::fake::RecordedCall;
use pilot_tracker::{FakeTracker, GithubRateLimitRecognizer, PathTokenScopeExtractor};
use std::time::Duration;

struct DirectCommitHandler;

#[async_trait]
impl Handler for DirectCommitHandler {
    async fn handle(&self, _issue: &Issue) -> Result<IssueResult, String> {
        Ok(IssueResult {
            success: true,
            pr_number: 0,
            pr_url: String::new(),
            head_sha: String::new(),
            branch_name: String::new(),
            error: None,
        })
    }
}

struct NoopPrCreated;

#[async_trait]
impl OnPrCreated for NoopPrCreated {
    async fn on_pr_created(&self, _event: PrCreatedEvent) {}
}

struct NoopFailedCleaned;

#[async_trait]
impl OnFailedCleaned for NoopFailedCleaned {
    async fn on_failed_cleaned(&self, _issue_number: u64) {}
}

async fn build_lifecycle(tracker: Arc<FakeTracker>) -> Lifecycle<SystemClock, FixedDateTimeSource> {
    let index = Arc::new(InProcessExecutionIndex::new());

    let poller = PollerBuilder::new()
        .tracker(tracker.clone())
        .store(Arc::new(InMemoryProcessedStore::new()))
        .handler(Arc::new(DirectCommitHandler))
        .on_pr_created(Arc::new(NoopPrCreated))
        .on_failed_cleaned(Arc::new(NoopFailedCleaned))
        .on_dispatch_started(index.clone())
        .on_dispatch_finished(index.clone())
        .retry_queue(Arc::new(pilot_engine::InProcessRetryQueue::new()))
        .rate_limit(Arc::new(GithubRateLimitRecognizer))
        .scope_extractor(Arc::new(PathTokenScopeExtractor))
        .config(PollerConfig::default().owner("acme").repo("widgets").work_ready_label("pilot"))
        .build()
        .await
        .unwrap();

    let cleaner = Cleaner::with_clock(
        tracker,
        index,
        CleanerConfig { interval: Duration::from_secs(3600), ..config_for_repo() },
        FixedDateTimeSource(Utc::now()),
    );

    Lifecycle::new(Arc::new(poller), Arc::new(cleaner))
}

fn config_for_repo() -> CleanerConfig {
    CleanerConfig { owner: "acme".to_string(), repo: "widgets".to_string(), ..CleanerConfig::default() }
}

#[tokio::test]
async fn start_runs_an_initial_cleaner_sweep_and_spawns_the_poller_loop() {
    let tracker = Arc::new(FakeTracker::new());
    let lifecycle = build_lifecycle(tracker.clone()).await;

    lifecycle.start().await.unwrap();
    tokio::task::yield_now().await;

    // No issues were seeded, so the sweep is a no-op; confirm it ran via
    // the two list_issues calls (one per reserved label).
    let calls = tracker.calls();
    assert!(calls.iter().filter(|c| matches!(c, RecordedCall::ListIssues)).count() >= 2);

    lifecycle.drain().await;
}

#[tokio::test]
async fn stop_cancels_both_loops_without_waiting() {
    let tracker = Arc::new(FakeTracker::new());
    let lifecycle = build_lifecycle(tracker).await;

    lifecycle.start().await.unwrap();
    lifecycle.stop();
    // stop() is synchronous and must not hang; a second call is harmless.
    lifecycle.stop();
}
