// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn mark_then_is_processed_round_trips() {
    let store = InMemoryProcessedStore::new();
    assert!(!store.is_processed(44).await.unwrap());
    store.mark(44, "dispatched").await.unwrap();
    assert!(store.is_processed(44).await.unwrap());
}

#[tokio::test]
async fn unmark_clears_the_flag() {
    let store = InMemoryProcessedStore::new();
    store.mark(44, "dispatched").await.unwrap();
    store.unmark(44).await.unwrap();
    assert!(!store.is_processed(44).await.unwrap());
}

#[tokio::test]
async fn double_mark_is_indistinguishable_from_one() {
    let store = InMemoryProcessedStore::new();
    store.mark(7, "a").await.unwrap();
    store.mark(7, "b").await.unwrap();
    assert_eq!(store.load_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn load_all_reflects_every_marked_issue() {
    let store = InMemoryProcessedStore::new();
    store.mark(1, "").await.unwrap();
    store.mark(2, "").await.unwrap();
    let all = store.load_all().await.unwrap();
    assert_eq!(all, std::collections::HashSet::from([1, 2]));
}
