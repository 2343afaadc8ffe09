// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `BoardMapping` cache (spec §3, §5): `{projectID, fieldID, optionName →
//! optionID}`, resolved exactly once per process lifetime on first use.
//! A `RwLock` with double-checked resolution — cheap read-path on every
//! subsequent call, single resolution even under concurrent first-use.

use parking_lot::RwLock;
use pilot_core::{BoardSyncError, BoardTransport, OptionMap};

#[derive(Debug, Clone)]
pub struct BoardMapping {
    pub project_id: String,
    pub field_id: String,
    pub options: OptionMap,
}

#[derive(Default)]
pub struct BoardMappingCache {
    mapping: RwLock<Option<BoardMapping>>,
}

impl BoardMappingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached mapping, resolving it via `transport` on first
    /// use. Concurrent first-callers may both reach the write lock, but
    /// only one resolution's result is kept — harmless, since resolution
    /// is idempotent and read-only against the tracker.
    pub async fn get_or_resolve(
        &self,
        transport: &dyn BoardTransport,
        owner: &str,
        project_number: u64,
    ) -> Result<BoardMapping, BoardSyncError> {
        if let Some(mapping) = self.mapping.read().clone() {
            return Ok(mapping);
        }

        let project_id = transport.resolve_project(owner, project_number).await?;
        let (field_id, options) = transport.resolve_status_field(&project_id).await?;
        let mapping = BoardMapping { project_id, field_id, options };

        let mut guard = self.mapping.write();
        if guard.is_none() {
            *guard = Some(mapping.clone());
        }
        Ok(mapping)
    }

    /// Explicit reset (spec §3: "further cache misses require explicit
    /// reset") — used when an operator reconfigures the board field.
    pub fn reset(&self) {
        *self.mapping.write() = None;
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
