// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency-line parsing for admission filtering (spec §4.1.5).
//!
//! An issue body may declare dependencies via lines matching
//! (case-insensitive) `(depends on|blocked by|requires):? #<number>`. This
//! module owns only the text scan; resolving each referenced number
//! against the tracker is the poller's job.

use std::collections::BTreeSet;

/// Scans `body` for dependency declarations and returns the deduplicated,
/// sorted set of referenced issue numbers.
pub fn extract_dependency_numbers(body: &str) -> BTreeSet<u64> {
    let lower = body.to_ascii_lowercase();
    let mut numbers = BTreeSet::new();

    for keyword in ["depends on", "blocked by", "requires"] {
        let mut search_from = 0;
        while let Some(rel_idx) = lower[search_from..].find(keyword) {
            let idx = search_from + rel_idx + keyword.len();
            search_from = idx;
            if let Some(number) = parse_hash_number(&lower[idx..]) {
                numbers.insert(number);
            }
        }
    }

    numbers
}

/// Parses an optional `:` and whitespace, then `#<digits>`, from the
/// start of `rest`.
fn parse_hash_number(rest: &str) -> Option<u64> {
    let mut s = rest.trim_start();
    s = s.strip_prefix(':').unwrap_or(s).trim_start();
    let s = s.strip_prefix('#')?;
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

#[cfg(test)]
#[path = "dependencies_tests.rs"]
mod tests;
