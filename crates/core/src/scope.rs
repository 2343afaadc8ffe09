// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Auto-mode scope-overlap guard (spec §3 `DispatchGroup`, §4.1.4).
//!
//! A tick's candidate set is partitioned with union-find over each
//! candidate's extracted directory-scope tokens: two candidates land in
//! the same group iff their token sets intersect, transitively. From
//! each group only the oldest candidate (by `created_at`) is dispatched;
//! the rest are deferred to the next tick.

use crate::issue::Issue;
use std::collections::HashMap;

/// Extracts directory-scope tokens from issue prose (spec §4.1.4, §9:
/// "the extractor is a collaborator"). `pilot-tracker` provides the
/// concrete scanner; the grammar it implements is fixed in
/// SPEC_FULL.md §4.1.
pub trait ScopeExtractor: Send + Sync + 'static {
    fn extract(&self, text: &str) -> Vec<String>;
}

/// Union-find over a tick's candidates, partitioned by scope-token
/// overlap. Rebuilt every tick; never persisted.
pub struct DispatchGroups {
    parent: Vec<usize>,
}

impl DispatchGroups {
    /// Partitions `candidates` using `extractor` over each issue's body.
    /// Returns one group per partition, each sorted ascending by
    /// `created_at` (oldest first) — callers dispatch `group[0]` and
    /// defer the rest.
    pub fn partition(candidates: &[Issue], extractor: &dyn ScopeExtractor) -> Vec<Vec<Issue>> {
        let n = candidates.len();
        let mut groups = DispatchGroups { parent: (0..n).collect() };

        let mut token_owner: HashMap<String, usize> = HashMap::new();
        for (i, issue) in candidates.iter().enumerate() {
            for token in extractor.extract(&issue.body) {
                match token_owner.get(&token) {
                    Some(&owner) => groups.union(owner, i),
                    None => {
                        token_owner.insert(token, i);
                    }
                }
            }
        }

        let mut buckets: HashMap<usize, Vec<Issue>> = HashMap::new();
        for (i, issue) in candidates.iter().enumerate() {
            let root = groups.find(i);
            buckets.entry(root).or_default().push(issue.clone());
        }

        let mut result: Vec<Vec<Issue>> = buckets.into_values().collect();
        for group in &mut result {
            group.sort_by_key(|issue| issue.created_at);
        }
        result
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
