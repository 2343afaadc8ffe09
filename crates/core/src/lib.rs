// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pilot-core: traits, data model, and pure algorithms shared by every
//! other crate in this workspace. No I/O lives here — every external
//! capability (tracker transport, persistence, board sync) is a trait,
//! implemented elsewhere.

pub mod macros;

pub mod board;
pub mod clock;
pub mod dependencies;
pub mod issue;
pub mod labels;
pub mod processed;
pub mod results;
pub mod retry;
pub mod scope;
pub mod tracker;

pub use board::{BoardSyncError, BoardTransport, OptionMap};
pub use clock::{Clock, FakeClock, SystemClock};
pub use dependencies::extract_dependency_numbers;
#[cfg(any(test, feature = "test-support"))]
pub use issue::IssueBuilder;
pub use issue::{Issue, IssueState};
pub use labels::{has_status_label, DONE, FAILED, IN_PROGRESS, STATUS_LABELS};
pub use processed::{ProcessedStore, StorageError};
pub use results::{IssueResult, MergeWaitResult, PullRequestSnapshot, PullRequestState};
pub use retry::{RetryQueue, RetryTicket};
pub use scope::{DispatchGroups, ScopeExtractor};
pub use tracker::{ListIssuesQuery, RateLimitRecognizer, TrackerError, TrackerPort};
