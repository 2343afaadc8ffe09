// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn file_mention_normalizes_to_its_containing_directory() {
    let tokens = PathTokenScopeExtractor.extract("touches internal/storage/cache.go today");
    assert_eq!(tokens, vec!["internal/storage".to_string()]);
}

#[test]
fn bare_directory_mention_is_kept_as_is() {
    let tokens = PathTokenScopeExtractor.extract("see internal/storage/ for details");
    assert_eq!(tokens, vec!["internal/storage".to_string()]);
}

#[test]
fn urls_are_excluded() {
    let tokens = PathTokenScopeExtractor.extract("see https://example.com/a/b for context");
    assert!(tokens.is_empty());
}

#[test]
fn tokens_without_a_slash_are_ignored() {
    let tokens = PathTokenScopeExtractor.extract("fix the bug in main.go please");
    assert!(tokens.is_empty());
}

#[test]
fn scenario_four_overlap_matches() {
    let storage_file = PathTokenScopeExtractor.extract("internal/storage/cache.go");
    let storage_dir = PathTokenScopeExtractor.extract("internal/storage/");
    let unrelated = PathTokenScopeExtractor.extract("cmd/cli/");

    assert_eq!(storage_file, storage_dir);
    assert_ne!(storage_file, unrelated);
}

#[test]
fn trailing_punctuation_is_stripped() {
    let tokens = PathTokenScopeExtractor.extract("(see cmd/cli/main.go).");
    assert_eq!(tokens, vec!["cmd/cli".to_string()]);
}
