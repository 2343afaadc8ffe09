// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanerError {
    #[error("tracker error: {0}")]
    Tracker(#[from] pilot_core::TrackerError),
    #[error("cleaner already started")]
    AlreadyStarted,
}

/// Errors surfaced by [`crate::Lifecycle::start`], covering both
/// components it assembles.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("poller: {0}")]
    Poller(#[from] pilot_engine::PollerError),
    #[error("cleaner: {0}")]
    Cleaner(#[from] CleanerError),
}
