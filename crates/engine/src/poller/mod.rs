// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Poller (spec §4.1): periodic discovery, admission filtering,
//! dispatch under the configured execution mode, processed-set upkeep,
//! orphan recovery, and the auto-mode scope-overlap guard.

pub mod admission;
pub mod config;
pub mod dependencies;
pub mod orphan;
pub mod processed;
pub mod retry_queue;

pub use config::{ExecutionMode, PollerConfig};
pub use processed::ProcessedSet;
pub use retry_queue::InProcessRetryQueue;

use crate::callbacks::{
    Handler, OnDispatchFinished, OnDispatchStarted, OnFailedCleaned, OnPrCreated, OnStatusChanged, PrCreatedEvent,
};
use crate::error::PollerError;
use crate::merge_waiter::MergeWaiter;
use admission::AdmissionDecision;
use pilot_core::{
    labels, Clock, DispatchGroups, Issue, ListIssuesQuery, ProcessedStore, RateLimitRecognizer,
    RetryQueue, RetryTicket, ScopeExtractor, SystemClock, TrackerPort,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const RATE_LIMIT_SLACK: std::time::Duration = std::time::Duration::from_secs(5 * 60);
const CONFLICT_PAUSE: std::time::Duration = std::time::Duration::from_secs(5 * 60);

pub struct PollerBuilder<C: Clock = SystemClock> {
    tracker: Option<Arc<dyn TrackerPort>>,
    store: Option<Arc<dyn ProcessedStore>>,
    handler: Option<Arc<dyn Handler>>,
    on_pr_created: Option<Arc<dyn OnPrCreated>>,
    on_failed_cleaned: Option<Arc<dyn OnFailedCleaned>>,
    on_dispatch_started: Option<Arc<dyn OnDispatchStarted>>,
    on_dispatch_finished: Option<Arc<dyn OnDispatchFinished>>,
    on_status_changed: Option<Arc<dyn OnStatusChanged>>,
    retry_queue: Option<Arc<dyn RetryQueue>>,
    rate_limit: Option<Arc<dyn RateLimitRecognizer>>,
    scope_extractor: Option<Arc<dyn ScopeExtractor>>,
    clock: C,
    config: PollerConfig,
}

impl Default for PollerBuilder<SystemClock> {
    fn default() -> Self {
        Self {
            tracker: None,
            store: None,
            handler: None,
            on_pr_created: None,
            on_failed_cleaned: None,
            on_dispatch_started: None,
            on_dispatch_finished: None,
            on_status_changed: None,
            retry_queue: None,
            rate_limit: None,
            scope_extractor: None,
            clock: SystemClock,
            config: PollerConfig::default(),
        }
    }
}

impl<C: Clock> PollerBuilder<C> {
    pub fn tracker(mut self, tracker: Arc<dyn TrackerPort>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn store(mut self, store: Arc<dyn ProcessedStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn on_pr_created(mut self, cb: Arc<dyn OnPrCreated>) -> Self {
        self.on_pr_created = Some(cb);
        self
    }

    pub fn on_failed_cleaned(mut self, cb: Arc<dyn OnFailedCleaned>) -> Self {
        self.on_failed_cleaned = Some(cb);
        self
    }

    pub fn on_dispatch_started(mut self, cb: Arc<dyn OnDispatchStarted>) -> Self {
        self.on_dispatch_started = Some(cb);
        self
    }

    pub fn on_dispatch_finished(mut self, cb: Arc<dyn OnDispatchFinished>) -> Self {
        self.on_dispatch_finished = Some(cb);
        self
    }

    pub fn on_status_changed(mut self, cb: Arc<dyn OnStatusChanged>) -> Self {
        self.on_status_changed = Some(cb);
        self
    }

    pub fn retry_queue(mut self, queue: Arc<dyn RetryQueue>) -> Self {
        self.retry_queue = Some(queue);
        self
    }

    pub fn rate_limit(mut self, recognizer: Arc<dyn RateLimitRecognizer>) -> Self {
        self.rate_limit = Some(recognizer);
        self
    }

    pub fn scope_extractor(mut self, extractor: Arc<dyn ScopeExtractor>) -> Self {
        self.scope_extractor = Some(extractor);
        self
    }

    pub fn config(mut self, config: PollerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock<C2: Clock>(self, clock: C2) -> PollerBuilder<C2> {
        PollerBuilder {
            tracker: self.tracker,
            store: self.store,
            handler: self.handler,
            on_pr_created: self.on_pr_created,
            on_failed_cleaned: self.on_failed_cleaned,
            on_dispatch_started: self.on_dispatch_started,
            on_dispatch_finished: self.on_dispatch_finished,
            on_status_changed: self.on_status_changed,
            retry_queue: self.retry_queue,
            rate_limit: self.rate_limit,
            scope_extractor: self.scope_extractor,
            clock,
            config: self.config,
        }
    }

    /// Loads the processed-set from the store and assembles a
    /// `Poller`. `scope_extractor` is required only for auto mode, but
    /// is always required here to keep the builder's surface small.
    pub async fn build(self) -> Result<Poller<C>, PollerError> {
        let store = self.store.ok_or(PollerError::MissingBuilderField("store"))?;
        let processed = ProcessedSet::load(store).await?;

        Ok(Poller {
            tracker: self.tracker.ok_or(PollerError::MissingBuilderField("tracker"))?,
            processed: Arc::new(processed),
            handler: self.handler.ok_or(PollerError::MissingBuilderField("handler"))?,
            on_pr_created: self.on_pr_created.ok_or(PollerError::MissingBuilderField("on_pr_created"))?,
            on_failed_cleaned: self.on_failed_cleaned,
            on_dispatch_started: self.on_dispatch_started,
            on_dispatch_finished: self.on_dispatch_finished,
            on_status_changed: self.on_status_changed,
            retry_queue: self.retry_queue.ok_or(PollerError::MissingBuilderField("retry_queue"))?,
            rate_limit: self.rate_limit.ok_or(PollerError::MissingBuilderField("rate_limit"))?,
            scope_extractor: self.scope_extractor.ok_or(PollerError::MissingBuilderField("scope_extractor"))?,
            stopping: Arc::new(AtomicBool::new(false)),
            semaphore: Arc::new(Semaphore::new(self.config.max_concurrent)),
            cancel: CancellationToken::new(),
            loop_handle: AsyncMutex::new(None),
            clock: self.clock,
            config: self.config,
        })
    }
}

impl PollerBuilder<SystemClock> {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The assembled poller. Wrap in `Arc` to call [`Poller::start`].
pub struct Poller<C: Clock = SystemClock> {
    tracker: Arc<dyn TrackerPort>,
    processed: Arc<ProcessedSet>,
    handler: Arc<dyn Handler>,
    on_pr_created: Arc<dyn OnPrCreated>,
    on_failed_cleaned: Option<Arc<dyn OnFailedCleaned>>,
    on_dispatch_started: Option<Arc<dyn OnDispatchStarted>>,
    on_dispatch_finished: Option<Arc<dyn OnDispatchFinished>>,
    on_status_changed: Option<Arc<dyn OnStatusChanged>>,
    retry_queue: Arc<dyn RetryQueue>,
    rate_limit: Arc<dyn RateLimitRecognizer>,
    scope_extractor: Arc<dyn ScopeExtractor>,
    clock: C,
    config: PollerConfig,
    stopping: Arc<AtomicBool>,
    /// One permit per in-flight handler invocation, consumed by
    /// `maxConcurrent` in parallel/auto modes and released on
    /// completion; `drain` waits by acquiring them all back.
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    loop_handle: AsyncMutex<Option<JoinHandle<()>>>,
}

impl<C: Clock> Poller<C> {
    /// Runs orphan recovery, then spawns the dispatch loop. Returns
    /// once the loop task is spawned; does not block on it.
    pub async fn start(self: &Arc<Self>) -> Result<(), PollerError> {
        let mut handle_slot = self.loop_handle.lock().await;
        if handle_slot.is_some() {
            return Err(PollerError::AlreadyStarted);
        }

        orphan::recover(self.tracker.as_ref(), &self.config.owner, &self.config.repo, &self.config.work_ready_label).await;

        let this = Arc::clone(self);
        *handle_slot = Some(tokio::spawn(async move { this.run_loop().await }));
        Ok(())
    }

    /// Stops accepting new dispatches and waits for in-flight handler
    /// invocations to return, without cancelling them.
    pub async fn drain(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        if let Some(handle) = self.loop_handle.lock().await.take() {
            let _ = handle.await;
        }
        // Every permit returning to the semaphore means every in-flight
        // handler task has released its slot.
        if let Ok(permits) = self.semaphore.acquire_many(self.config.max_concurrent as u32).await {
            permits.forget();
        }
    }

    /// Cancels the polling loop immediately; in-flight handler
    /// invocations observe cancellation via their own tracker calls.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub async fn clear_processed(&self, issue_number: u64) -> Result<(), PollerError> {
        self.processed.unmark(issue_number).await?;
        Ok(())
    }

    async fn run_loop(self: Arc<Self>) {
        loop {
            if self.stopping.load(Ordering::SeqCst) || self.cancel.is_cancelled() {
                return;
            }

            self.drain_due_retries().await;

            match self.config.mode {
                ExecutionMode::Sequential => self.tick_sequential().await,
                ExecutionMode::Parallel | ExecutionMode::Auto => Self::tick_concurrent(&self).await,
            }

            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
    }

    async fn list_candidates(&self) -> Result<Vec<Issue>, PollerError> {
        let query = ListIssuesQuery::with_label(&self.config.work_ready_label);
        let issues = self.tracker.list_issues(&self.config.owner, &self.config.repo, &query).await?;

        let mut candidates = Vec::new();
        for issue in issues {
            let decision = admission::evaluate(&issue, &self.processed, &self.config.work_ready_label).await?;
            if decision != AdmissionDecision::Eligible {
                continue;
            }
            if dependencies::has_unresolved_dependencies(&issue, self.tracker.as_ref(), &self.config.owner, &self.config.repo).await {
                continue;
            }
            candidates.push(issue);
        }
        Ok(candidates)
    }

    async fn drain_due_retries(&self) {
        for ticket in self.retry_queue.due(self.clock.epoch_ms()).await {
            match self.tracker.get_issue(&self.config.owner, &self.config.repo, ticket.issue_number).await {
                Ok(issue) => self.dispatch_one(issue).await,
                Err(e) => warn!(issue = ticket.issue_number, error = %e, "retry: could not re-fetch issue, dropping this retry attempt"),
            }
        }
    }

    async fn tick_sequential(&self) {
        let mut candidates = match self.list_candidates().await {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "sequential tick: candidate listing failed");
                return;
            }
        };
        candidates.sort_by_key(|issue| issue.created_at);

        if let Some(issue) = candidates.into_iter().next() {
            self.dispatch_one(issue).await;
        }
    }

    /// Takes `&Arc<Self>` rather than a `self: Arc<Self>` receiver so
    /// each dispatched candidate can clone a fresh owning handle onto
    /// its own spawned task.
    async fn tick_concurrent(poller: &Arc<Self>) {
        let candidates = match poller.list_candidates().await {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "concurrent tick: candidate listing failed");
                return;
            }
        };

        let dispatchable = match poller.config.mode {
            ExecutionMode::Auto => DispatchGroups::partition(&candidates, poller.scope_extractor.as_ref())
                .into_iter()
                .filter_map(|mut group| {
                    let deferred = group.split_off(1.min(group.len()));
                    info!(deferred = deferred.len(), "auto mode: deferred overlapping siblings to next tick");
                    group.into_iter().next()
                })
                .collect::<Vec<_>>(),
            _ => candidates,
        };

        for issue in dispatchable {
            if poller.stopping.load(Ordering::SeqCst) || poller.cancel.is_cancelled() {
                break;
            }

            // Pre-mark before acquiring a slot so the next tick never
            // re-dispatches this candidate (spec §4.1.4).
            if let Err(e) = poller.processed.mark(issue.number, "dispatched (parallel/auto)").await {
                warn!(issue = issue.number, error = %e, "failed to pre-mark processed set (best-effort)");
            }

            let Ok(permit) = Arc::clone(&poller.semaphore).acquire_owned().await else {
                break;
            };
            let this = Arc::clone(poller);
            tokio::spawn(async move {
                this.dispatch_one(issue).await;
                drop(permit);
            });
        }
    }

    async fn dispatch_one(&self, issue: Issue) {
        if let Some(cb) = &self.on_dispatch_started {
            cb.on_dispatch_started(issue.number).await;
        }

        let owner = self.config.owner.clone();
        let repo = self.config.repo.clone();

        if let Err(e) = self.tracker.add_labels(&owner, &repo, issue.number, &[labels::IN_PROGRESS.to_string()]).await {
            warn!(issue = issue.number, error = %e, "failed to set in-progress label");
        }
        let _ = self.tracker.remove_label(&owner, &repo, issue.number, labels::FAILED).await;
        let _ = self.tracker.add_comment(&owner, &repo, issue.number, &pilot_notify::started()).await;
        self.notify_status_changed(&issue, labels::IN_PROGRESS).await;

        match self.handler.handle(&issue).await {
            Ok(result) => self.on_handler_success(&issue, result).await,
            Err(message) => self.on_handler_error(&issue, &message).await,
        }

        if let Some(cb) = &self.on_dispatch_finished {
            cb.on_dispatch_finished(issue.number).await;
        }
    }

    async fn on_handler_error(&self, issue: &Issue, message: &str) {
        let owner = &self.config.owner;
        let repo = &self.config.repo;

        if self.rate_limit.is_rate_limit_error(message) {
            if let Some(reset) = self.rate_limit.parse_reset_epoch_ms(message) {
                self.retry_queue
                    .enqueue(RetryTicket {
                        issue_number: issue.number,
                        repo: format!("{owner}/{repo}"),
                        not_before_epoch_ms: reset + RATE_LIMIT_SLACK.as_millis() as u64,
                    })
                    .await;
            }
            // Rate-limited: roll back the in-progress label set at dispatch
            // start so the issue's labels are left exactly as found (spec
            // §8 scenario 2: "no label mutation"). Do not mark processed,
            // do not flag failed.
            let _ = self.tracker.remove_label(owner, repo, issue.number, labels::IN_PROGRESS).await;
            return;
        }

        warn!(issue = issue.number, error = %message, "handler attempt failed");
        let _ = self.tracker.remove_label(owner, repo, issue.number, labels::IN_PROGRESS).await;
        if let Err(e) = self.tracker.add_labels(owner, repo, issue.number, &[labels::FAILED.to_string()]).await {
            warn!(issue = issue.number, error = %e, "failed to set failed label");
        }
        let _ = self.tracker.add_comment(owner, repo, issue.number, &pilot_notify::failed(message)).await;
        self.notify_status_changed(issue, labels::FAILED).await;
    }

    async fn on_handler_success(&self, issue: &Issue, result: pilot_core::IssueResult) {
        let owner = &self.config.owner;
        let repo = &self.config.repo;

        if let Some(error) = &result.error {
            self.on_handler_error(issue, error).await;
            return;
        }

        if result.is_direct_commit() {
            self.mark_done(issue, "").await;
            return;
        }

        if result.pr_number == 0 {
            // success == false and no PR and no error message: treat as
            // an opaque failure, consistent with §7's handler-error policy.
            self.on_handler_error(issue, "handler reported failure with no error detail").await;
            return;
        }

        self.on_pr_created
            .on_pr_created(PrCreatedEvent {
                pr_number: result.pr_number,
                pr_url: result.pr_url.clone(),
                issue_number: issue.number,
                head_sha: result.head_sha.clone(),
                branch_name: result.branch_name.clone(),
            })
            .await;

        if !self.config.wait_for_merge {
            self.mark_done(issue, &result.pr_url).await;
            return;
        }

        match self.wait_for_merge_with_ceiling(result.pr_number).await {
            Some(outcome) if outcome.merged => self.mark_done(issue, &result.pr_url).await,
            Some(outcome) if outcome.conflicting => {
                warn!(issue = issue.number, pr = result.pr_number, "merge conflicting, pausing pipeline");
                self.pause(owner, repo).await;
            }
            Some(outcome) if outcome.timed_out => {
                warn!(issue = issue.number, pr = result.pr_number, "merge wait timed out, in-progress label left for the reaper");
                self.pause(owner, repo).await;
            }
            Some(_closed) => {
                info!(issue = issue.number, pr = result.pr_number, "pull request closed without merging");
            }
            None => {
                warn!(issue = issue.number, pr = result.pr_number, "merge wait retry ceiling exceeded, marking failed");
                let _ = self.tracker.remove_label(owner, repo, issue.number, labels::IN_PROGRESS).await;
                let _ = self.tracker.add_labels(owner, repo, issue.number, &[labels::FAILED.to_string()]).await;
                let _ = self
                    .tracker
                    .add_comment(owner, repo, issue.number, &pilot_notify::failed("merge wait retry ceiling exceeded"))
                    .await;
                self.notify_status_changed(issue, labels::FAILED).await;
            }
        }
    }

    async fn mark_done(&self, issue: &Issue, pr_url: &str) {
        let issue_number = issue.number;
        let owner = &self.config.owner;
        let repo = &self.config.repo;
        let _ = self.tracker.remove_label(owner, repo, issue_number, labels::IN_PROGRESS).await;
        if let Err(e) = self.tracker.add_labels(owner, repo, issue_number, &[labels::DONE.to_string()]).await {
            warn!(issue = issue_number, error = %e, "failed to set done label");
        }
        let _ = self.tracker.add_comment(owner, repo, issue_number, &pilot_notify::completed(pr_url)).await;
        if let Err(e) = self.processed.mark(issue_number, "merged").await {
            warn!(issue = issue_number, error = %e, "failed to persist processed mark (best-effort)");
        }
        self.notify_status_changed(issue, labels::DONE).await;
    }

    async fn notify_status_changed(&self, issue: &Issue, status_name: &str) {
        if let Some(cb) = &self.on_status_changed {
            cb.on_status_changed(&issue.node_id, status_name).await;
        }
    }

    async fn pause(&self, _owner: &str, _repo: &str) {
        tokio::select! {
            _ = self.cancel.cancelled() => {}
            _ = tokio::time::sleep(CONFLICT_PAUSE) => {}
        }
    }

    async fn wait_for_merge_with_ceiling(&self, pr_number: u64) -> Option<pilot_core::MergeWaitResult> {
        let waiter: MergeWaiter<dyn TrackerPort> = MergeWaiter::new(
            Arc::clone(&self.tracker),
            self.config.owner.clone(),
            self.config.repo.clone(),
            self.config.pr_poll_interval,
            self.config.pr_timeout,
        );

        let mut attempts = 0u32;
        loop {
            match waiter.wait(pr_number, &self.cancel, None).await {
                Ok(result) => return Some(result),
                Err(crate::error::MergeWaitError::Cancelled) => return None,
                Err(crate::error::MergeWaitError::InitialCheckFailed(e)) => {
                    attempts += 1;
                    warn!(pr_number, attempt = attempts, error = %e, "merge wait initial check failed");
                    if attempts >= self.config.max_merge_wait_retries {
                        return None;
                    }
                    tokio::select! {
                        _ = self.cancel.cancelled() => return None,
                        _ = tokio::time::sleep(CONFLICT_PAUSE) => {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
