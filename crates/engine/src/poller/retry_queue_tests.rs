// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn ticket(issue_number: u64, not_before_epoch_ms: u64) -> RetryTicket {
    RetryTicket { issue_number, repo: "o/r".to_string(), not_before_epoch_ms }
}

#[tokio::test]
async fn due_returns_only_elapsed_tickets() {
    let queue = InProcessRetryQueue::new();
    queue.enqueue(ticket(1, 1_000)).await;
    queue.enqueue(ticket(2, 5_000)).await;

    let due = queue.due(2_000).await;

    assert_eq!(due.len(), 1);
    assert_eq!(due[0].issue_number, 1);
}

#[tokio::test]
async fn popped_tickets_are_not_returned_twice() {
    let queue = InProcessRetryQueue::new();
    queue.enqueue(ticket(1, 1_000)).await;

    let first = queue.due(2_000).await;
    let second = queue.due(2_000).await;

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}

#[tokio::test]
async fn not_yet_due_tickets_stay_queued() {
    let queue = InProcessRetryQueue::new();
    queue.enqueue(ticket(1, 10_000)).await;

    let due = queue.due(2_000).await;

    assert!(due.is_empty());
    assert_eq!(queue.due(10_000).await.len(), 1);
}

#[tokio::test]
async fn due_orders_ties_by_enqueue_but_respects_deadline() {
    let queue = InProcessRetryQueue::new();
    queue.enqueue(ticket(2, 3_000)).await;
    queue.enqueue(ticket(1, 1_000)).await;
    queue.enqueue(ticket(3, 2_000)).await;

    let due = queue.due(3_000).await;

    assert_eq!(due.len(), 3);
}
