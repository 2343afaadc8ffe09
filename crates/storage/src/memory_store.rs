// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `ProcessedStore`, permitted by spec §6.2 for tests. Never
//! durable — restarting the process loses everything it holds.

use async_trait::async_trait;
use parking_lot::Mutex;
use pilot_core::{ProcessedStore, StorageError};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct InMemoryProcessedStore {
    marked: Arc<Mutex<HashSet<u64>>>,
}

impl InMemoryProcessedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProcessedStore for InMemoryProcessedStore {
    async fn mark(&self, issue_number: u64, _note: &str) -> Result<(), StorageError> {
        self.marked.lock().insert(issue_number);
        Ok(())
    }

    async fn unmark(&self, issue_number: u64) -> Result<(), StorageError> {
        self.marked.lock().remove(&issue_number);
        Ok(())
    }

    async fn is_processed(&self, issue_number: u64) -> Result<bool, StorageError> {
        Ok(self.marked.lock().contains(&issue_number))
    }

    async fn load_all(&self) -> Result<HashSet<u64>, StorageError> {
        Ok(self.marked.lock().clone())
    }
}

#[cfg(test)]
#[path = "memory_store_tests.rs"]
mod tests;
