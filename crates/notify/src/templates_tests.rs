// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn completed_mentions_the_pr_url() {
    assert!(completed("https://github.com/o/r/pull/1").contains("https://github.com/o/r/pull/1"));
}

#[test]
fn failed_mentions_the_reason_and_the_retry_hint() {
    let body = failed("handler crashed");
    assert!(body.contains("handler crashed"));
    assert!(body.to_lowercase().contains("retry"));
}

#[test]
fn cleanup_templates_are_distinct() {
    assert_ne!(cleanup_stale_in_progress(), cleanup_stale_failed());
}
