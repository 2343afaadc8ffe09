// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    exact_case = { "work-ready", "work-ready", true },
    upper_case = { "work-ready", "WORK-READY", true },
    mixed_case = { "Work-Ready", "work-READY", true },
    no_match = { "work-ready", "in-progress", false },
)]
fn has_label_is_case_insensitive(stored: &str, query: &str, expected: bool) {
    let issue = Issue::builder().label(stored).build();
    assert_eq!(issue.has_label(query), expected);
}

#[test]
fn is_open_reflects_state() {
    assert!(Issue::builder().state(IssueState::Open).build().is_open());
    assert!(!Issue::builder().state(IssueState::Closed).build().is_open());
}
