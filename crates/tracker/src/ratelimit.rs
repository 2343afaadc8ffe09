// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recognition and parsing of GitHub's rate-limit error shape (spec
//! §6.5). GitHub surfaces two distinct rate-limit conditions as error
//! bodies: the primary limit (`"API rate limit exceeded"`) and the
//! secondary, abuse-detection limit (`"You have exceeded a secondary
//! rate limit"`). Both carry the reset time in the `X-RateLimit-Reset`
//! response header (unix seconds), which the transport layer folds into
//! the error text as `X-RateLimit-Reset: <seconds>` before it reaches
//! this recognizer.

use pilot_core::RateLimitRecognizer;

const PRIMARY_MARKER: &str = "api rate limit exceeded";
const SECONDARY_MARKER: &str = "you have exceeded a secondary rate limit";
const RESET_HEADER: &str = "x-ratelimit-reset:";

#[derive(Debug, Clone, Copy, Default)]
pub struct GithubRateLimitRecognizer;

impl RateLimitRecognizer for GithubRateLimitRecognizer {
    fn is_rate_limit_error(&self, message: &str) -> bool {
        let lower = message.to_ascii_lowercase();
        lower.contains(PRIMARY_MARKER) || lower.contains(SECONDARY_MARKER)
    }

    fn parse_reset_epoch_ms(&self, message: &str) -> Option<u64> {
        let lower = message.to_ascii_lowercase();
        let idx = lower.find(RESET_HEADER)? + RESET_HEADER.len();
        let digits: String =
            lower[idx..].trim_start().chars().take_while(|c| c.is_ascii_digit()).collect();
        let unix_seconds: u64 = digits.parse().ok()?;
        Some(unix_seconds.saturating_mul(1000))
    }
}

#[cfg(test)]
#[path = "ratelimit_tests.rs"]
mod tests;
