// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollerError {
    #[error("tracker error: {0}")]
    Tracker(#[from] pilot_core::TrackerError),
    #[error("storage error: {0}")]
    Storage(#[from] pilot_core::StorageError),
    #[error("poller already started")]
    AlreadyStarted,
    #[error("missing required builder field: {0}")]
    MissingBuilderField(&'static str),
}

#[derive(Debug, Error)]
pub enum MergeWaitError {
    #[error("tracker error on initial check: {0}")]
    InitialCheckFailed(#[from] pilot_core::TrackerError),
    #[error("cancelled")]
    Cancelled,
}
