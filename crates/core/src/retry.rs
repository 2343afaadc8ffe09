// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RetryQueue` and `RetryTicket` (SPEC_FULL.md §3 supplement). Spec
//! §4.1.3 step 4 names "the retry scheduler" as a collaborator without
//! giving it a shape; this is the minimal concrete contract it implies.

use async_trait::async_trait;

/// One deferred re-dispatch, produced when a dispatch attempt hits the
/// tracker's rate limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryTicket {
    pub issue_number: u64,
    pub repo: String,
    /// Epoch milliseconds. The core adds 5 minutes of slack to the
    /// tracker-reported reset time before constructing this (spec §6.5).
    pub not_before_epoch_ms: u64,
}

#[async_trait]
pub trait RetryQueue: Send + Sync + 'static {
    /// Schedule a deferred re-dispatch.
    async fn enqueue(&self, ticket: RetryTicket);

    /// Pop every ticket whose `not_before_epoch_ms` has elapsed, in no
    /// particular order among tickets that are simultaneously due.
    async fn due(&self, now_epoch_ms: u64) -> Vec<RetryTicket>;
}
