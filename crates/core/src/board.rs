// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `BoardTransport` — the narrow GraphQL seam `BoardSync` calls through
//! (SPEC_FULL.md §4.4 supplement). Keeps `pilot-board`'s cache and
//! idempotence logic decoupled from the concrete GitHub Projects v2
//! GraphQL wire format, mirroring how `TrackerPort` decouples the poller
//! from REST.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardSyncError {
    #[error("project not found for {owner}")]
    ProjectNotFound { owner: String },
    #[error("status field not found on project {project_id}")]
    StatusFieldNotFound { project_id: String },
    #[error("transport error: {0}")]
    Transport(String),
}

/// Single-select field options for the status column, keyed by
/// lowercased option name (spec §4.4: "status-name matching is
/// case-insensitive").
pub type OptionMap = HashMap<String, String>;

#[async_trait]
pub trait BoardTransport: Send + Sync + 'static {
    /// Resolve a project's id by owner+number, organization scope first,
    /// falling back to user scope.
    async fn resolve_project(&self, owner: &str, project_number: u64) -> Result<String, BoardSyncError>;

    /// Resolve the single-select status field's id and its option map.
    async fn resolve_status_field(&self, project_id: &str) -> Result<(String, OptionMap), BoardSyncError>;

    /// Add the issue to the board if absent, returning the item id
    /// either way (idempotent on the tracker side).
    async fn upsert_item(&self, project_id: &str, issue_node_id: &str) -> Result<String, BoardSyncError>;

    async fn set_status(
        &self,
        project_id: &str,
        field_id: &str,
        item_id: &str,
        option_id: &str,
    ) -> Result<(), BoardSyncError>;
}
