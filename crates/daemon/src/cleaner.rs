// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The stale-label reaper (spec §4.3). Removes orphaned `in-progress` /
//! `failed` labels from issues whose executions are no longer active,
//! then posts an explanatory comment. Grounded on
//! `crates/daemon/src/lifecycle/reconcile.rs`'s sweep-and-act-with-
//! skip-reasons shape: the teacher's `reconcile_sessions` skips sessions
//! still `in_use`; this skips issues still in the `ExecutionIndex` or
//! under threshold.

use crate::execution_index::{issue_identifier, ExecutionIndex};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pilot_core::{labels, ListIssuesQuery, TrackerPort};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Supplies the current wall-clock time. Split out from `pilot_core::Clock`
/// since this component compares `chrono::DateTime<Utc>` timestamps read
/// off issues, not `Instant`s — mirrors that trait's real/fake split.
pub trait DateTimeSource: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDateTimeSource;

impl DateTimeSource for SystemDateTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[derive(Clone)]
pub struct FixedDateTimeSource(pub DateTime<Utc>);

#[cfg(any(test, feature = "test-support"))]
impl DateTimeSource for FixedDateTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanerConfig {
    pub owner: String,
    pub repo: String,
    pub interval: Duration,
    pub in_progress_threshold: Duration,
    pub failed_threshold: Duration,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            interval: Duration::from_secs(30 * 60),
            in_progress_threshold: Duration::from_secs(60 * 60),
            failed_threshold: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Fired after the Cleaner removes a stale `failed` label, so the host
/// can clear the Poller's processed-set entry for this issue (spec §4.3
/// step 5, §6.3 `OnFailedCleaned`).
#[async_trait]
pub trait OnFailedCleaned: Send + Sync + 'static {
    async fn on_failed_cleaned(&self, issue_number: u64);
}

pub struct Cleaner<D: DateTimeSource = SystemDateTimeSource> {
    tracker: Arc<dyn TrackerPort>,
    execution_index: Arc<dyn ExecutionIndex>,
    on_failed_cleaned: Option<Arc<dyn OnFailedCleaned>>,
    config: CleanerConfig,
    clock: D,
    cancel: CancellationToken,
    loop_handle: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

/// Count of labels cleaned in one sweep, split by kind (spec §8 scenario 5).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub in_progress_cleaned: usize,
    pub failed_cleaned: usize,
}

impl Cleaner<SystemDateTimeSource> {
    pub fn new(
        tracker: Arc<dyn TrackerPort>,
        execution_index: Arc<dyn ExecutionIndex>,
        config: CleanerConfig,
    ) -> Self {
        Self::with_clock(tracker, execution_index, config, SystemDateTimeSource)
    }
}

impl<D: DateTimeSource> Cleaner<D> {
    pub fn with_clock(
        tracker: Arc<dyn TrackerPort>,
        execution_index: Arc<dyn ExecutionIndex>,
        config: CleanerConfig,
        clock: D,
    ) -> Self {
        Self {
            tracker,
            execution_index,
            on_failed_cleaned: None,
            config,
            clock,
            cancel: CancellationToken::new(),
            loop_handle: tokio::sync::Mutex::new(None),
        }
    }

    pub fn on_failed_cleaned(mut self, cb: Arc<dyn OnFailedCleaned>) -> Self {
        self.on_failed_cleaned = Some(cb);
        self
    }
}

impl<D: DateTimeSource> Cleaner<D> {
    /// Runs one sweep immediately, then spawns the interval loop (spec
    /// §4.3: "run at interval, and once on start").
    pub async fn start(self: &Arc<Self>) -> Result<(), crate::error::CleanerError> {
        let mut handle_slot = self.loop_handle.lock().await;
        if handle_slot.is_some() {
            return Err(crate::error::CleanerError::AlreadyStarted);
        }

        self.sweep().await;

        let this = Arc::clone(self);
        *handle_slot = Some(tokio::spawn(async move { this.run_loop().await }));
        Ok(())
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    async fn run_loop(self: Arc<Self>) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(self.config.interval) => {}
            }
            if self.cancel.is_cancelled() {
                return;
            }
            self.sweep().await;
        }
    }

    /// One reconciliation pass over both reserved status labels. Public
    /// so `pilot-cli` (and tests) can drive deterministic sweeps without
    /// waiting on the interval ticker.
    pub async fn sweep(&self) -> SweepReport {
        let in_progress_cleaned =
            self.sweep_label(labels::IN_PROGRESS, self.config.in_progress_threshold, false).await;
        let failed_cleaned = self.sweep_label(labels::FAILED, self.config.failed_threshold, true).await;
        SweepReport { in_progress_cleaned, failed_cleaned }
    }

    async fn sweep_label(&self, label: &str, threshold: Duration, is_failed: bool) -> usize {
        let query = ListIssuesQuery { labels: vec![label.to_string()], open_only: true };
        let issues = match self.tracker.list_issues(&self.config.owner, &self.config.repo, &query).await {
            Ok(issues) => issues,
            Err(e) => {
                warn!(label, error = %e, "cleaner: list_issues failed, skipping this label's sweep");
                return 0;
            }
        };

        let active = self.execution_index.active_identifiers();
        let threshold_chrono = chrono::Duration::from_std(threshold).unwrap_or(chrono::Duration::zero());
        let now = self.clock.now();
        let mut cleaned = 0usize;

        for issue in issues {
            if active.contains(&issue_identifier(issue.number)) {
                continue;
            }
            if now - issue.updated_at < threshold_chrono {
                continue;
            }

            if let Err(e) =
                self.tracker.remove_label(&self.config.owner, &self.config.repo, issue.number, label).await
            {
                warn!(issue = issue.number, label, error = %e, "cleaner: failed to remove stale label");
                continue;
            }

            let comment = if is_failed {
                pilot_notify::cleanup_stale_failed()
            } else {
                pilot_notify::cleanup_stale_in_progress()
            };
            let _ = self
                .tracker
                .add_comment(&self.config.owner, &self.config.repo, issue.number, &comment)
                .await;

            info!(issue = issue.number, label, "cleaner: removed stale label");
            cleaned += 1;

            if is_failed {
                if let Some(cb) = &self.on_failed_cleaned {
                    cb.on_failed_cleaned(issue.number).await;
                }
            }
        }

        cleaned
    }
}

#[cfg(test)]
#[path = "cleaner_tests.rs"]
mod tests;
