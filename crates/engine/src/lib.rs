// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pilot-engine: the Poller, MergeWaiter, and the host-callback
//! boundary (spec §4.1, §4.2, §6.3). `pilot-daemon` adds the Cleaner
//! and ties everything together into a running process.

pub mod callbacks;
pub mod error;
pub mod merge_waiter;
pub mod poller;

pub use callbacks::{
    Handler, OnDispatchFinished, OnDispatchStarted, OnFailedCleaned, OnPrCreated, OnStatusChanged, PrCreatedEvent,
};
pub use error::{MergeWaitError, PollerError};
pub use merge_waiter::{MergeWaiter, OnPollCallback};
pub use poller::{ExecutionMode, InProcessRetryQueue, Poller, PollerBuilder, PollerConfig, ProcessedSet};
