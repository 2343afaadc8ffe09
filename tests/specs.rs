//! Black-box behavioral specifications for the `pilot` binary.
//!
//! These invoke the compiled binary and verify stdout/stderr/exit codes.
//! Anything that would require a live tracker API or worker process is
//! out of scope here — that contract is covered by the crate-level unit
//! and fake-tracker tests instead.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/cli/help.rs"]
mod cli_help;
#[path = "specs/cli/errors.rs"]
mod cli_errors;
