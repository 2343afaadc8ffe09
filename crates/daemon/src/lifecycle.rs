// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level process lifecycle tying the Poller and Cleaner together
//! (SPEC_FULL.md §2 crate-to-component mapping). Grounded on
//! `crates/daemon/src/lifecycle/mod.rs`'s role as the daemon's top-level
//! assembly point: that file itself was absent from the retrieval pack,
//! so this is grounded on the sibling `reconcile.rs`'s dependency-
//! injection shape (`ReconcileCtx`), generalized here to own both loops
//! instead of one reconciliation pass.

use crate::cleaner::{Cleaner, DateTimeSource, SystemDateTimeSource};
use crate::error::LifecycleError;
use pilot_core::{Clock, SystemClock};
use pilot_engine::Poller;
use std::sync::Arc;
use tracing::info;

/// Owns the Poller and Cleaner for one process run. `pilot-cli` builds
/// both components, wraps them here, and drives `start`/`drain`/`stop`
/// from its own signal-handling loop.
pub struct Lifecycle<C: Clock = SystemClock, D: DateTimeSource = SystemDateTimeSource> {
    poller: Arc<Poller<C>>,
    cleaner: Arc<Cleaner<D>>,
}

impl<C: Clock, D: DateTimeSource> Lifecycle<C, D> {
    pub fn new(poller: Arc<Poller<C>>, cleaner: Arc<Cleaner<D>>) -> Self {
        Self { poller, cleaner }
    }

    /// Starts orphan recovery + the Poller's dispatch loop, then the
    /// Cleaner's sweep loop (which runs one sweep immediately).
    pub async fn start(&self) -> Result<(), LifecycleError> {
        self.poller.start().await?;
        self.cleaner.start().await?;
        info!("pilot lifecycle started");
        Ok(())
    }

    /// Graceful shutdown (spec §4.1 Drain): stop accepting new
    /// dispatches, let in-flight handlers finish, then stop the Cleaner.
    pub async fn drain(&self) {
        info!("pilot lifecycle draining");
        self.poller.drain().await;
        self.cleaner.stop();
    }

    /// Immediate shutdown (spec §4.1 Stop via context cancel): cancels
    /// both loops without waiting for in-flight handlers.
    pub fn stop(&self) {
        info!("pilot lifecycle stopping");
        self.poller.stop();
        self.cleaner.stop();
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
