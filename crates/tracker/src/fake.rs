// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process `TrackerPort` double for deterministic tests, following
//! this stack's trait/real-impl/fake-impl convention (mirrored from the
//! desktop notify adapter's `fake` module).

use async_trait::async_trait;
use parking_lot::Mutex;
use pilot_core::{
    Issue, ListIssuesQuery, PullRequestSnapshot, TrackerError, TrackerPort,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    ListIssues,
    GetIssue(u64),
    AddLabels(u64, Vec<String>),
    RemoveLabel(u64, String),
    AddComment(u64, String),
    GetPullRequest(u64),
}

struct State {
    issues: HashMap<u64, Issue>,
    pull_requests: HashMap<u64, Result<PullRequestSnapshot, String>>,
    next_comment_id: u64,
    calls: Vec<RecordedCall>,
}

/// Fake tracker. Seed it with issues and scripted PR snapshots, then
/// drive it through a `TrackerPort` consumer; call `calls()` afterward
/// to assert on what the consumer did.
#[derive(Clone)]
pub struct FakeTracker {
    inner: Arc<Mutex<State>>,
}

impl Default for FakeTracker {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(State {
                issues: HashMap::new(),
                pull_requests: HashMap::new(),
                next_comment_id: 1,
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_issue(&self, issue: Issue) {
        self.inner.lock().issues.insert(issue.number, issue);
    }

    /// Scripts the response `get_pull_request` returns for `number`.
    /// Call again with a new snapshot between ticks to simulate state
    /// progressing (e.g. `mergeable: None` then `mergeable: Some(true)`).
    pub fn seed_pull_request(&self, number: u64, snapshot: PullRequestSnapshot) {
        self.inner.lock().pull_requests.insert(number, Ok(snapshot));
    }

    pub fn seed_pull_request_error(&self, number: u64, message: impl Into<String>) {
        self.inner.lock().pull_requests.insert(number, Err(message.into()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().calls.clone()
    }

    pub fn issue(&self, number: u64) -> Option<Issue> {
        self.inner.lock().issues.get(&number).cloned()
    }
}

#[async_trait]
impl TrackerPort for FakeTracker {
    async fn list_issues(
        &self,
        _owner: &str,
        _repo: &str,
        query: &ListIssuesQuery,
    ) -> Result<Vec<Issue>, TrackerError> {
        let mut state = self.inner.lock();
        state.calls.push(RecordedCall::ListIssues);
        let mut issues: Vec<Issue> = state
            .issues
            .values()
            .filter(|issue| !query.open_only || issue.is_open())
            .filter(|issue| query.labels.iter().all(|label| issue.has_label(label)))
            .cloned()
            .collect();
        issues.sort_by_key(|issue| issue.created_at);
        Ok(issues)
    }

    async fn get_issue(&self, _owner: &str, _repo: &str, number: u64) -> Result<Issue, TrackerError> {
        let mut state = self.inner.lock();
        state.calls.push(RecordedCall::GetIssue(number));
        state.issues.get(&number).cloned().ok_or_else(|| TrackerError::NotFound(number.to_string()))
    }

    async fn add_labels(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), TrackerError> {
        let mut state = self.inner.lock();
        state.calls.push(RecordedCall::AddLabels(number, labels.to_vec()));
        if let Some(issue) = state.issues.get_mut(&number) {
            issue.labels.extend(labels.iter().cloned());
        }
        Ok(())
    }

    async fn remove_label(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        label: &str,
    ) -> Result<(), TrackerError> {
        let mut state = self.inner.lock();
        state.calls.push(RecordedCall::RemoveLabel(number, label.to_string()));
        if let Some(issue) = state.issues.get_mut(&number) {
            issue.labels.retain(|l| !l.eq_ignore_ascii_case(label));
        }
        Ok(())
    }

    async fn add_comment(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        body: &str,
    ) -> Result<u64, TrackerError> {
        let mut state = self.inner.lock();
        state.calls.push(RecordedCall::AddComment(number, body.to_string()));
        let id = state.next_comment_id;
        state.next_comment_id += 1;
        Ok(id)
    }

    async fn get_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
    ) -> Result<PullRequestSnapshot, TrackerError> {
        let mut state = self.inner.lock();
        state.calls.push(RecordedCall::GetPullRequest(number));
        match state.pull_requests.get(&number) {
            Some(Ok(snapshot)) => Ok(snapshot.clone()),
            Some(Err(message)) => Err(TrackerError::Transient(message.clone())),
            None => Err(TrackerError::NotFound(number.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
