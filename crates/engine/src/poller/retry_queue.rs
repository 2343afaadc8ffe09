// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process `RetryQueue` (spec §4.1.3 step 4, SPEC_FULL.md §3
//! supplement). A min-heap keyed by `not_before_epoch_ms` so `due()`
//! only walks the tickets that are actually ready.

use async_trait::async_trait;
use pilot_core::{RetryQueue, RetryTicket};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled(RetryTicket);

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the earliest deadline sorts first.
        other.0.not_before_epoch_ms.cmp(&self.0.not_before_epoch_ms)
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
pub struct InProcessRetryQueue {
    heap: parking_lot::Mutex<BinaryHeap<Scheduled>>,
}

impl InProcessRetryQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RetryQueue for InProcessRetryQueue {
    async fn enqueue(&self, ticket: RetryTicket) {
        self.heap.lock().push(Scheduled(ticket));
    }

    async fn due(&self, now_epoch_ms: u64) -> Vec<RetryTicket> {
        let mut heap = self.heap.lock();
        let mut due = Vec::new();
        while let Some(top) = heap.pop() {
            if top.0.not_before_epoch_ms > now_epoch_ms {
                heap.push(top);
                break;
            }
            due.push(top.0);
        }
        due
    }
}

#[cfg(test)]
#[path = "retry_queue_tests.rs"]
mod tests;
