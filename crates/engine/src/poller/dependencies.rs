// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency resolution for admission filtering (spec §4.1.5): the
//! text scan lives in `pilot_core::dependencies`; this module resolves
//! each referenced number against the tracker and decides whether the
//! candidate must be deferred.

use pilot_core::{extract_dependency_numbers, Issue, TrackerPort};
use tracing::warn;

/// True if `issue` references at least one dependency that is still
/// open, or that failed to resolve (resolved conservatively as open).
pub async fn has_unresolved_dependencies(issue: &Issue, tracker: &dyn TrackerPort, owner: &str, repo: &str) -> bool {
    for number in extract_dependency_numbers(&issue.body) {
        match tracker.get_issue(owner, repo, number).await {
            Ok(dependency) if dependency.is_open() => return true,
            Ok(_) => {}
            Err(e) => {
                warn!(issue = issue.number, dependency = number, error = %e, "could not resolve dependency, deferring conservatively");
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
#[path = "dependencies_tests.rs"]
mod tests;
