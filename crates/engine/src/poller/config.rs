// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    Parallel,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    pub owner: String,
    pub repo: String,
    pub work_ready_label: String,
    pub poll_interval: Duration,
    pub mode: ExecutionMode,
    pub max_concurrent: usize,
    pub wait_for_merge: bool,
    pub pr_poll_interval: Duration,
    pub pr_timeout: Duration,
    /// Caps the per-issue merge-wait retry loop (SPEC_FULL.md §4.1,
    /// resolving spec.md §9's open question about an unbounded retry
    /// risk on a permanently broken PR).
    pub max_merge_wait_retries: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            work_ready_label: "pilot".to_string(),
            poll_interval: Duration::from_secs(60),
            mode: ExecutionMode::Sequential,
            max_concurrent: 4,
            wait_for_merge: true,
            pr_poll_interval: Duration::from_secs(30),
            pr_timeout: Duration::from_secs(3600),
            max_merge_wait_retries: 6,
        }
    }
}

impl PollerConfig {
    pilot_core::setters! {
        into { owner: String, repo: String, work_ready_label: String }
        set { poll_interval: Duration, mode: ExecutionMode, max_concurrent: usize,
              wait_for_merge: bool, pr_poll_interval: Duration, pr_timeout: Duration,
              max_merge_wait_retries: u32 }
    }
}
