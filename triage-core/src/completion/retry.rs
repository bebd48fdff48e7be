//! Retry policy and error classification for completion calls
//!
//! This module decides whether a failed attempt is worth repeating and how
//! long to wait before the next one.

use super::error::CompletionError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of retries after the initial attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay before the first retry (milliseconds)
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// How a failure should be treated by the retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Worth another attempt if any remain
    Transient,
    /// Abort the call immediately
    Fatal,
}

/// Classify a failed attempt.
///
/// Rate limiting (429), server errors (>= 500) and transport failures are
/// transient. Everything else, including malformed or empty responses, is
/// fatal.
pub fn classify(error: &CompletionError) -> Disposition {
    match error {
        CompletionError::Http { status, .. } if is_retryable_status(*status) => {
            Disposition::Transient
        }
        CompletionError::Network(_) => Disposition::Transient,
        _ => Disposition::Fatal,
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || status >= 500
}

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (not including the initial attempt)
    pub max_retries: u32,

    /// Delay before the first retry; doubles on every subsequent retry
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
        }
    }

    /// Create a policy with no retries
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Total number of attempts a call may make
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay after the failed attempt number `attempt` (zero-based):
    /// `base_delay_ms * 2^attempt`
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    /// Check if we should retry based on the error and attempt count
    pub fn should_retry(&self, error: &CompletionError, attempt: u32) -> bool {
        attempt < self.max_retries && classify(error) == Disposition::Transient
    }
}
