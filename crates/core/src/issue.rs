// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The abstract work item the poller discovers and dispatches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Open/closed state of an issue, as reported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
}

crate::simple_display! {
    IssueState {
        Open => "open",
        Closed => "closed",
    }
}

/// A tracker issue, as read by the core. The tracker remains source of
/// truth; the core never owns this data, only mutates labels/comments.
///
/// Derives `Serialize` so hosts can hand the whole struct to a handler
/// process as JSON (`pilot-cli::handler::ProcessHandler` does exactly
/// this) instead of hand-assembling a payload field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub node_id: String,
    pub title: String,
    pub body: String,
    pub state: IssueState,
    pub labels: HashSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Case-insensitive label membership check.
    ///
    /// spec.md §9 Open Question: the source is inconsistent on case
    /// sensitivity across tests. Resolved here as case-insensitive per
    /// SPEC_FULL.md §9 — confirm against operator expectations before
    /// relying on exact-case label names elsewhere.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }

    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }

    crate::setters! {
        into { title: String, body: String }
    }
}

/// Test builder for [`Issue`]. Hand-rolled rather than generated by
/// [`crate::builder!`] since `created_at`/`updated_at` need independent
/// optional overrides and `labels` accumulates via repeated calls.
#[cfg(any(test, feature = "test-support"))]
pub struct IssueBuilder {
    number: u64,
    node_id: String,
    title: String,
    body: String,
    state: IssueState,
    labels: HashSet<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[cfg(any(test, feature = "test-support"))]
impl Default for IssueBuilder {
    fn default() -> Self {
        Self {
            number: 1,
            node_id: "I_test".into(),
            title: "test issue".into(),
            body: String::new(),
            state: IssueState::Open,
            labels: HashSet::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl IssueBuilder {
    pub fn number(mut self, n: u64) -> Self {
        self.number = n;
        self
    }

    pub fn state(mut self, state: IssueState) -> Self {
        self.state = state;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    pub fn build(self) -> Issue {
        let now = Utc::now();
        Issue {
            number: self.number,
            node_id: self.node_id,
            title: self.title,
            body: self.body,
            state: self.state,
            labels: self.labels,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Issue {
    pub fn builder() -> IssueBuilder {
        IssueBuilder::default()
    }
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
