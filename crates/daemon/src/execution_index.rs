// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ExecutionIndex` (spec §4.3 step 1, SPEC_FULL.md §4.3 supplement): the
//! Cleaner's view of which issue numbers currently have a live dispatch
//! in this process. Identifiers take the form `"GH-<issueNumber>"`.
//!
//! Populated via `pilot_engine`'s `OnDispatchStarted`/`OnDispatchFinished`
//! callbacks, wired at construction time the same way `OnPRCreated` is —
//! this is the concrete collaborator spec.md leaves unnamed ("the set of
//! currently active execution identifiers").

use async_trait::async_trait;
use parking_lot::RwLock;
use pilot_engine::{OnDispatchFinished, OnDispatchStarted};
use std::collections::HashSet;

pub trait ExecutionIndex: Send + Sync + 'static {
    fn active_identifiers(&self) -> HashSet<String>;
}

pub fn issue_identifier(issue_number: u64) -> String {
    format!("GH-{issue_number}")
}

#[derive(Default)]
pub struct InProcessExecutionIndex {
    active: RwLock<HashSet<String>>,
}

impl InProcessExecutionIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExecutionIndex for InProcessExecutionIndex {
    fn active_identifiers(&self) -> HashSet<String> {
        self.active.read().clone()
    }
}

#[async_trait]
impl OnDispatchStarted for InProcessExecutionIndex {
    async fn on_dispatch_started(&self, issue_number: u64) {
        self.active.write().insert(issue_identifier(issue_number));
    }
}

#[async_trait]
impl OnDispatchFinished for InProcessExecutionIndex {
    async fn on_dispatch_finished(&self, issue_number: u64) {
        self.active.write().remove(&issue_identifier(issue_number));
    }
}

#[cfg(test)]
#[path = "execution_index_tests.rs"]
mod tests;
