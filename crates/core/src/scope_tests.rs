// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{Duration, Utc};

struct WhitespaceExtractor;

impl ScopeExtractor for WhitespaceExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .filter(|token| token.contains('/'))
            .map(|token| token.trim_end_matches(['.', ',', ')', ':']))
            .map(|token| token.trim_end_matches('/'))
            .map(|token| match token.rsplit_once('/') {
                Some((dir, last)) if last.contains('.') => dir.to_string(),
                _ => token.to_string(),
            })
            .collect()
    }
}

#[test]
fn overlapping_scopes_group_together_oldest_first() {
    let now = Utc::now();
    let a = Issue::builder()
        .number(20)
        .body("touches internal/storage/")
        .created_at(now - Duration::hours(3))
        .build();
    let b = Issue::builder()
        .number(21)
        .body("touches internal/storage/cache.go")
        .created_at(now - Duration::hours(2))
        .build();
    let c = Issue::builder()
        .number(22)
        .body("touches cmd/cli/")
        .created_at(now - Duration::hours(2))
        .build();

    let groups = DispatchGroups::partition(&[a, b, c], &WhitespaceExtractor);

    assert_eq!(groups.len(), 2);
    let storage_group = groups.iter().find(|g| g.len() == 2).unwrap();
    assert_eq!(storage_group[0].number, 20);
    let solo_group = groups.iter().find(|g| g.len() == 1).unwrap();
    assert_eq!(solo_group[0].number, 22);
}

#[test]
fn disjoint_scopes_each_form_their_own_group() {
    let now = Utc::now();
    let a = Issue::builder().number(1).body("touches a/b").created_at(now).build();
    let b = Issue::builder().number(2).body("touches c/d").created_at(now).build();

    let groups = DispatchGroups::partition(&[a, b], &WhitespaceExtractor);
    assert_eq!(groups.len(), 2);
}
