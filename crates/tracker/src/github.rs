// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TrackerPort` implementation over the GitHub REST API via `octocrab`.

use crate::ratelimit::GithubRateLimitRecognizer;
use async_trait::async_trait;
use octocrab::models::IssueState as OctoIssueState;
use octocrab::Octocrab;
use pilot_core::{
    Issue, IssueState, ListIssuesQuery, PullRequestSnapshot, PullRequestState, RateLimitRecognizer,
    TrackerError, TrackerPort,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Transient-5xx retry budget (spec §7: "base 1s, cap 30s, 3 attempts;
/// after that surface to caller"). Rate limits and 4xx are never
/// retried here — only a 5xx response is eligible.
const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BASE: Duration = Duration::from_secs(1);
const RETRY_CAP: Duration = Duration::from_secs(30);

fn is_server_error(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() >= 500)
}

/// Retries `attempt` up to [`RETRY_ATTEMPTS`] times with exponential
/// backoff when it fails with a 5xx response; any other failure (4xx,
/// rate limit, transport error) is returned immediately on first try.
async fn with_retry<T, F, Fut>(mut attempt: F) -> Result<T, octocrab::Error>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, octocrab::Error>>,
{
    let mut delay = RETRY_BASE;
    for attempt_no in 1..=RETRY_ATTEMPTS {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if is_server_error(&err) && attempt_no < RETRY_ATTEMPTS => {
                warn!(attempt = attempt_no, error = %err, "transient tracker error, retrying after backoff");
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(RETRY_CAP);
            }
            Err(err) => return Err(err),
        }
    }
    unreachable!("loop always returns by the final attempt")
}

pub struct GithubTracker {
    client: Arc<Octocrab>,
    rate_limits: GithubRateLimitRecognizer,
}

impl GithubTracker {
    /// Builds a client authenticated with a personal-access or
    /// installation bearer token. The token itself is resolved by the
    /// host (`pilot-cli`) from the environment, never from this crate.
    pub fn new(token: impl Into<String>) -> Result<Self, TrackerError> {
        let client = Octocrab::builder()
            .personal_token(token.into())
            .build()
            .map_err(|e| TrackerError::Other(e.to_string()))?;
        Ok(Self::from_client(Arc::new(client)))
    }

    /// Builds a tracker over an already-constructed client, so the host
    /// can share one authenticated `Octocrab` between this and
    /// `GithubBoardTransport` instead of building two.
    pub fn from_client(client: Arc<Octocrab>) -> Self {
        Self { client, rate_limits: GithubRateLimitRecognizer }
    }

    fn classify(&self, err: octocrab::Error) -> TrackerError {
        let message = err.to_string();
        if self.rate_limits.is_rate_limit_error(&message) {
            let reset_epoch_ms = self.rate_limits.parse_reset_epoch_ms(&message).unwrap_or(0);
            return TrackerError::RateLimited { reset_epoch_ms };
        }
        match &err {
            octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404 => {
                TrackerError::NotFound(message)
            }
            octocrab::Error::GitHub { source, .. }
                if source.status_code.as_u16() == 401 || source.status_code.as_u16() == 403 =>
            {
                TrackerError::Auth(message)
            }
            octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() >= 500 => {
                TrackerError::Transient(message)
            }
            _ => TrackerError::Other(message),
        }
    }
}

fn to_core_issue(issue: octocrab::models::issues::Issue) -> Issue {
    let labels: HashSet<String> = issue.labels.into_iter().map(|label| label.name).collect();
    let state = match issue.state {
        OctoIssueState::Open => IssueState::Open,
        _ => IssueState::Closed,
    };
    Issue {
        number: issue.number,
        node_id: issue.node_id,
        title: issue.title,
        body: issue.body.unwrap_or_default(),
        state,
        labels,
        created_at: issue.created_at,
        updated_at: issue.updated_at,
    }
}

#[async_trait]
impl TrackerPort for GithubTracker {
    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        query: &ListIssuesQuery,
    ) -> Result<Vec<Issue>, TrackerError> {
        let page = with_retry(|| async {
            let mut builder = self.client.issues(owner, repo).list();
            if query.open_only {
                builder = builder.state(octocrab::params::State::Open);
            }
            if let Some(label) = query.labels.first() {
                builder = builder.labels(&[label.clone()]);
            }
            builder
                .sort(octocrab::params::issues::Sort::Created)
                .direction(octocrab::params::Direction::Ascending)
                .send()
                .await
        })
        .await
        .map_err(|e| self.classify(e))?;
        Ok(page.items.into_iter().map(to_core_issue).collect())
    }

    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue, TrackerError> {
        let issue = with_retry(|| self.client.issues(owner, repo).get(number))
            .await
            .map_err(|e| self.classify(e))?;
        Ok(to_core_issue(issue))
    }

    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), TrackerError> {
        with_retry(|| self.client.issues(owner, repo).add_labels(number, labels))
            .await
            .map_err(|e| self.classify(e))?;
        Ok(())
    }

    async fn remove_label(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        label: &str,
    ) -> Result<(), TrackerError> {
        let lower = label.to_lowercase();
        // GitHub treats removal of an absent label as a 404; the core's
        // contract (spec §6.1) is that this is success, not failure.
        match with_retry(|| self.client.issues(owner, repo).remove_label(number, &lower)).await {
            Ok(_) => Ok(()),
            Err(e) => match self.classify(e) {
                TrackerError::NotFound(_) => Ok(()),
                other => Err(other),
            },
        }
    }

    async fn add_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<u64, TrackerError> {
        let comment = with_retry(|| self.client.issues(owner, repo).create_comment(number, body))
            .await
            .map_err(|e| self.classify(e))?;
        Ok(comment.id.0)
    }

    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestSnapshot, TrackerError> {
        let pr = with_retry(|| self.client.pulls(owner, repo).get(number))
            .await
            .map_err(|e| self.classify(e))?;
        let state = match pr.state {
            Some(OctoIssueState::Open) => PullRequestState::Open,
            _ => PullRequestState::Closed,
        };
        Ok(PullRequestSnapshot {
            number: pr.number,
            url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
            state,
            merged: pr.merged_at.is_some(),
            mergeable: pr.mergeable,
        })
    }
}

