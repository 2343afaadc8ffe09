// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ProcessedStore` — the persistent `issueNumber → processed-flag`
//! mapping (spec §3 `ProcessedSet`, §6.2). Durable across restarts;
//! writes are best-effort from the poller's point of view (spec §4.1.6)
//! — the label state on the issue remains the durable truth.

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

#[async_trait]
pub trait ProcessedStore: Send + Sync + 'static {
    async fn mark(&self, issue_number: u64, note: &str) -> Result<(), StorageError>;
    async fn unmark(&self, issue_number: u64) -> Result<(), StorageError>;
    async fn is_processed(&self, issue_number: u64) -> Result<bool, StorageError>;
    async fn load_all(&self) -> Result<HashSet<u64>, StorageError>;
}
