//! Retry policy for transient tile fetch failures.
//!
//! Only errors reported as transient by
//! [`ProviderError::is_transient`](crate::provider::ProviderError::is_transient)
//! and per-attempt timeouts are retried. HTTP 4xx responses and decode
//! failures fail the tile on the first attempt.

use std::time::Duration;

/// First backoff delay in milliseconds.
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 250;

/// Longest backoff delay in seconds.
pub const DEFAULT_MAX_DELAY_SECS: u64 = 10;

/// Growth factor between consecutive backoff delays.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Attempts per tile, counting the first request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// How a tile fetch handles transient failures.
#[derive(Clone, Debug, PartialEq)]
pub enum RetryPolicy {
    /// One attempt per tile.
    None,

    /// Up to `max_attempts` requests, `delay` apart.
    Fixed { max_attempts: u32, delay: Duration },

    /// Up to `max_attempts` requests. The wait starts at `initial_delay`
    /// and is multiplied by `multiplier` after each failure, never
    /// exceeding `max_delay`.
    ExponentialBackoff {
        max_attempts: u32,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(DEFAULT_MAX_ATTEMPTS)
    }
}

impl RetryPolicy {
    /// Backoff with the default delays. Fewer than two attempts means
    /// [`RetryPolicy::None`].
    pub fn exponential(max_attempts: u32) -> Self {
        if max_attempts <= 1 {
            return Self::None;
        }
        Self::ExponentialBackoff {
            max_attempts,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_secs(DEFAULT_MAX_DELAY_SECS),
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }

    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self::Fixed {
            max_attempts,
            delay,
        }
    }

    /// How long to wait after attempt `attempt` (1-based) failed, or
    /// `None` if that was the last one.
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::Fixed {
                max_attempts,
                delay,
            } => (attempt < *max_attempts).then_some(*delay),
            Self::ExponentialBackoff {
                max_attempts,
                initial_delay,
                max_delay,
                multiplier,
            } => (attempt < *max_attempts).then(|| {
                let grown = initial_delay.as_secs_f64() * multiplier.powi(attempt as i32 - 1);
                Duration::from_secs_f64(grown.min(max_delay.as_secs_f64()))
            }),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::None => 1,
            Self::Fixed { max_attempts, .. } | Self::ExponentialBackoff { max_attempts, .. } => {
                (*max_attempts).max(1)
            }
        }
    }
}
