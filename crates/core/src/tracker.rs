// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TrackerPort` — the narrow contract the core requires from an issue
//! tracker (spec §6.1). The core never speaks HTTP or GraphQL directly;
//! `pilot-tracker` provides the GitHub implementation.

use crate::issue::Issue;
use crate::results::PullRequestSnapshot;
use async_trait::async_trait;
use thiserror::Error;

/// Errors a [`TrackerPort`] implementation can surface to the core.
///
/// Transport-specific detail (HTTP status, GraphQL error objects) is
/// collapsed into this taxonomy at the boundary — the core only ever
/// branches on these variants (spec §7).
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Rate-limited by the tracker. Carries the collaborator-parsed reset
    /// time so the poller can enqueue a deferred retry (spec §6.5).
    #[error("rate limited, resets at {reset_epoch_ms}")]
    RateLimited { reset_epoch_ms: u64 },

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Authentication or authorization failure (4xx, non-404).
    #[error("auth error: {0}")]
    Auth(String),

    /// Transient network or 5xx failure, after the transport's own
    /// retry budget (spec §7: base 1s, cap 30s, 3 attempts) is exhausted.
    #[error("transient tracker error: {0}")]
    Transient(String),

    /// Any other tracker failure not covered above.
    #[error("tracker error: {0}")]
    Other(String),
}

/// Filter and sort parameters for [`TrackerPort::list_issues`].
#[derive(Debug, Clone)]
pub struct ListIssuesQuery {
    pub labels: Vec<String>,
    pub open_only: bool,
}

impl ListIssuesQuery {
    pub fn with_label(label: impl Into<String>) -> Self {
        Self { labels: vec![label.into()], open_only: true }
    }
}

/// The minimum operations the core requires of an issue tracker (spec
/// §6.1). All methods are cancellation-safe: dropping the future before
/// it resolves must not leave the tracker in a partially mutated state
/// beyond what the tracker's own API guarantees.
#[async_trait]
pub trait TrackerPort: Send + Sync + 'static {
    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        query: &ListIssuesQuery,
    ) -> Result<Vec<Issue>, TrackerError>;

    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue, TrackerError>;

    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), TrackerError>;

    /// A 404 on label removal is success — the label is already gone.
    async fn remove_label(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        label: &str,
    ) -> Result<(), TrackerError>;

    async fn add_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<u64, TrackerError>;

    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestSnapshot, TrackerError>;
}

/// Recognizes and parses the tracker's rate-limit error shape (spec
/// §6.5). Implemented against GitHub's actual error bodies in
/// `pilot-tracker`; the core only consumes this contract.
pub trait RateLimitRecognizer: Send + Sync + 'static {
    fn is_rate_limit_error(&self, message: &str) -> bool;
    fn parse_reset_epoch_ms(&self, message: &str) -> Option<u64>;
}
