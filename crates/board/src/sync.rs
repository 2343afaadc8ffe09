// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `BoardSync` (spec §4.4): idempotently sets the status column of a
//! project-board card for a given issue. Best-effort — failures are
//! surfaced to the caller (who logs and moves on) but never block the
//! main dispatch loop.

use crate::cache::BoardMappingCache;
use pilot_core::{BoardSyncError, BoardTransport};
use std::sync::Arc;
use tracing::warn;

pub struct BoardSync {
    transport: Arc<dyn BoardTransport>,
    cache: BoardMappingCache,
    owner: String,
    project_number: u64,
}

impl BoardSync {
    pub fn new(transport: Arc<dyn BoardTransport>, owner: impl Into<String>, project_number: u64) -> Self {
        Self { transport, cache: BoardMappingCache::new(), owner: owner.into(), project_number }
    }

    /// Returns `Ok(())` on success, including the "status name unknown"
    /// case (spec §4.4: "log a warning and return nil"). Errors are only
    /// returned for transport/resolution failures — callers still treat
    /// those as best-effort and never let them block dispatch.
    pub async fn update_project_item_status(
        &self,
        issue_node_id: &str,
        status_name: &str,
    ) -> Result<(), BoardSyncError> {
        let mapping =
            self.cache.get_or_resolve(self.transport.as_ref(), &self.owner, self.project_number).await?;

        let Some(option_id) = mapping.options.get(&status_name.to_ascii_lowercase()) else {
            warn!(status_name, "status option not found on project board, skipping");
            return Ok(());
        };

        let item_id = self.transport.upsert_item(&mapping.project_id, issue_node_id).await?;
        self.transport
            .set_status(&mapping.project_id, &mapping.field_id, &item_id, option_id)
            .await
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
