//! Process-wide provider rate limiting.
//!
//! A single [`RateLimiter`] owns the reset time shared by every repository
//! client. The time is persisted in `appstate.json` so a cooldown outlives
//! the process. [`GuardedRepository`] wraps a client so that no request is
//! issued while the limit is active and every refusal is recorded.

pub mod guarded;
pub mod limiter;

pub use guarded::GuardedRepository;
pub use limiter::{LoggingObserver, RateLimitObserver, RateLimiter};

use regex::Regex;
use std::sync::LazyLock;

static RATE_LIMIT_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)rate.?limit").unwrap());

/// Whether an error or response message talks about a rate limit.
pub fn is_rate_limit_message(message: &str) -> bool {
    RATE_LIMIT_MESSAGE.is_match(message)
}
