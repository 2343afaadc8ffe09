// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory mirror over a [`ProcessedStore`] (spec §4.1.6). The mirror
//! lets admission checks stay synchronous under the read lock while the
//! durable store only sees writes.

use pilot_core::{ProcessedStore, StorageError};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

pub struct ProcessedSet {
    store: Arc<dyn ProcessedStore>,
    mirror: parking_lot::RwLock<HashSet<u64>>,
}

impl ProcessedSet {
    pub async fn load(store: Arc<dyn ProcessedStore>) -> Result<Self, StorageError> {
        let marked = store.load_all().await?;
        Ok(Self { store, mirror: parking_lot::RwLock::new(marked) })
    }

    pub fn is_processed(&self, issue_number: u64) -> bool {
        self.mirror.read().contains(&issue_number)
    }

    /// Inserts into the in-memory mirror unconditionally, then attempts
    /// to commit to the durable store. A store failure is logged and
    /// swallowed (spec §4.1.6: "processed-set writes are best-effort;
    /// the label state on the issue is the durable truth") — it must
    /// never abort the caller's tick or admission decision.
    pub async fn mark(&self, issue_number: u64, note: &str) -> Result<(), StorageError> {
        self.mirror.write().insert(issue_number);
        if let Err(e) = self.store.mark(issue_number, note).await {
            warn!(issue_number, error = %e, "processed-set store write failed (best-effort, in-memory mark retained)");
        }
        Ok(())
    }

    /// Symmetric best-effort removal; see [`Self::mark`].
    pub async fn unmark(&self, issue_number: u64) -> Result<(), StorageError> {
        self.mirror.write().remove(&issue_number);
        if let Err(e) = self.store.unmark(issue_number).await {
            warn!(issue_number, error = %e, "processed-set store removal failed (best-effort, in-memory unmark retained)");
        }
        Ok(())
    }

    pub fn snapshot(&self) -> HashSet<u64> {
        self.mirror.read().clone()
    }
}

#[cfg(test)]
#[path = "processed_tests.rs"]
mod tests;
