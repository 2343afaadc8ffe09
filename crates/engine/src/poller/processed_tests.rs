// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pilot_storage::InMemoryProcessedStore;

#[tokio::test]
async fn loads_preexisting_marks_from_the_backing_store() {
    let store = Arc::new(InMemoryProcessedStore::new());
    store.mark(42, "seeded").await.unwrap();

    let set = ProcessedSet::load(store).await.unwrap();

    assert!(set.is_processed(42));
    assert!(!set.is_processed(7));
}

#[tokio::test]
async fn mark_is_visible_through_the_mirror_immediately() {
    let store = Arc::new(InMemoryProcessedStore::new());
    let set = ProcessedSet::load(store).await.unwrap();

    set.mark(1, "done").await.unwrap();

    assert!(set.is_processed(1));
    assert_eq!(set.snapshot(), std::collections::HashSet::from([1]));
}

#[tokio::test]
async fn unmark_removes_from_both_mirror_and_store() {
    let store = Arc::new(InMemoryProcessedStore::new());
    let set = ProcessedSet::load(store.clone()).await.unwrap();
    set.mark(5, "done").await.unwrap();

    set.unmark(5).await.unwrap();

    assert!(!set.is_processed(5));
    assert!(!store.is_processed(5).await.unwrap());
}

/// A `ProcessedStore` that always fails, to prove the mirror stays
/// authoritative when the durable store is unavailable (spec §4.1.6:
/// "processed-set writes are best-effort; the label state on the issue
/// is the durable truth").
struct AlwaysFailingStore;

#[async_trait::async_trait]
impl pilot_core::ProcessedStore for AlwaysFailingStore {
    async fn mark(&self, _issue_number: u64, _note: &str) -> Result<(), pilot_core::StorageError> {
        Err(pilot_core::StorageError::Io("disk full".to_string()))
    }
    async fn unmark(&self, _issue_number: u64) -> Result<(), pilot_core::StorageError> {
        Err(pilot_core::StorageError::Io("disk full".to_string()))
    }
    async fn is_processed(&self, _issue_number: u64) -> Result<bool, pilot_core::StorageError> {
        Ok(false)
    }
    async fn load_all(&self) -> Result<std::collections::HashSet<u64>, pilot_core::StorageError> {
        Ok(std::collections::HashSet::new())
    }
}

#[tokio::test]
async fn mark_stays_visible_through_the_mirror_even_when_the_store_fails() {
    let set = ProcessedSet::load(Arc::new(AlwaysFailingStore)).await.unwrap();

    let result = set.mark(9, "done").await;

    assert!(result.is_ok(), "a store failure must not surface as an error to the caller");
    assert!(set.is_processed(9));
}

#[tokio::test]
async fn unmark_stays_visible_through_the_mirror_even_when_the_store_fails() {
    let set = ProcessedSet::load(Arc::new(AlwaysFailingStore)).await.unwrap();
    set.mark(9, "done").await.unwrap();

    let result = set.unmark(9).await;

    assert!(result.is_ok(), "a store failure must not surface as an error to the caller");
    assert!(!set.is_processed(9));
}
