// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One function per named template (spec §6.4: `started`, `completed`,
//! `failed`, `cleanup-stale-in-progress`, `cleanup-stale-failed`).

/// Posted when a handler has been dispatched for an issue.
pub fn started() -> String {
    "Picked up this issue — work is in progress.".to_string()
}

/// Posted when the dispatched PR has merged.
pub fn completed(pr_url: &str) -> String {
    format!("Merged: {pr_url}")
}

/// Posted when the handler attempt failed.
pub fn failed(reason: &str) -> String {
    format!("Attempt failed: {reason}\n\nRemove the `failed` label to retry.")
}

/// Posted by the Cleaner after stripping a stale `in-progress` label.
pub fn cleanup_stale_in_progress() -> String {
    "Removed a stale `in-progress` label — no active execution was found for this issue. \
     Re-add the work-ready label to retry."
        .to_string()
}

/// Posted by the Cleaner after stripping a stale `failed` label.
pub fn cleanup_stale_failed() -> String {
    "Removed a stale `failed` label after the retry threshold — this issue is retryable again."
        .to_string()
}

#[cfg(test)]
#[path = "templates_tests.rs"]
mod tests;
