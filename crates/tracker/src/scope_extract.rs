// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ExtractDirectoriesFromText` — the concrete scope-token scanner
//! (SPEC_FULL.md §4.1). Conservative by design: false negatives (an
//! overlap that goes undetected) are preferred over false positives
//! (serializing unrelated work).

use pilot_core::ScopeExtractor;

#[derive(Debug, Clone, Copy, Default)]
pub struct PathTokenScopeExtractor;

impl ScopeExtractor for PathTokenScopeExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        text.split(|c: char| c.is_whitespace() || matches!(c, '`' | '(' | ')'))
            .filter_map(normalize_token)
            .collect()
    }
}

fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim_end_matches([',', '.', ')', ':']);
    if !trimmed.contains('/') {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return None;
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | '-')) {
        return None;
    }

    let trimmed = trimmed.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    let normalized = match trimmed.rsplit_once('/') {
        Some((dir, last)) if last.contains('.') && !dir.is_empty() => dir.to_string(),
        _ => trimmed.to_string(),
    };
    Some(normalized)
}

#[cfg(test)]
#[path = "scope_extract_tests.rs"]
mod tests;
