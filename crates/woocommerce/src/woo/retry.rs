//! Retry policy for page fetches
//!
//! Transient failures (transport errors, 5xx, 429) are retried with
//! exponential backoff up to a fixed number of attempts. Client errors are
//! surfaced on the first occurrence.

use log::warn;
use std::time::Duration;

use crate::error::FetchError;

/// How a failed fetch should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Retryable,
    Permanent,
}

/// Decide whether a fetch failure is worth retrying
pub fn classify(error: &FetchError) -> Disposition {
    match error {
        FetchError::Transport(_) => Disposition::Retryable,
        FetchError::Status { code: 429 } => Disposition::Retryable,
        FetchError::Status { code } if (400..500).contains(code) => Disposition::Permanent,
        FetchError::Status { .. } => Disposition::Retryable,
        FetchError::Decode(_) => Disposition::Permanent,
        FetchError::RetriesExhausted { .. } => Disposition::Permanent,
    }
}

/// Exponential backoff with a bounded number of attempts
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry; doubles after every retry
    pub initial_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Upper bound for random jitter added to each delay
    pub max_jitter: Duration,
}

impl RetryPolicy {
    /// Policy with the connector's default timings
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            max_jitter: Duration::from_millis(100),
        }
    }

    /// Policy that retries without sleeping (for tests)
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based), without jitter
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out
    ///
    /// `op` receives the 1-based attempt number.
    pub fn run<T, F>(&self, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut(u32) -> Result<T, FetchError>,
    {
        let mut attempt = 1;
        loop {
            let error = match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if classify(&error) == Disposition::Permanent {
                return Err(error);
            }

            if attempt >= self.max_attempts {
                return Err(FetchError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(error),
                });
            }

            let delay = self.delay_for(attempt) + self.jitter();
            warn!(
                "Attempt {}/{} failed ({}), retrying in {:?}",
                attempt, self.max_attempts, error, delay
            );
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            attempt += 1;
        }
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand_jitter() % max_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(8)
    }
}

/// Generate a random value for jitter
fn rand_jitter() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let hasher = RandomState::new().build_hasher();
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(&FetchError::Transport("reset".into())), Disposition::Retryable);
        assert_eq!(classify(&FetchError::Status { code: 429 }), Disposition::Retryable);
        assert_eq!(classify(&FetchError::Status { code: 500 }), Disposition::Retryable);
        assert_eq!(classify(&FetchError::Status { code: 503 }), Disposition::Retryable);
        assert_eq!(classify(&FetchError::Status { code: 400 }), Disposition::Permanent);
        assert_eq!(classify(&FetchError::Status { code: 401 }), Disposition::Permanent);
        assert_eq!(classify(&FetchError::Status { code: 404 }), Disposition::Permanent);
        assert_eq!(classify(&FetchError::Status { code: 499 }), Disposition::Permanent);
        assert_eq!(classify(&FetchError::Decode("bad".into())), Disposition::Permanent);
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::new(10);
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(7), Duration::from_secs(60));
        assert_eq!(policy.delay_for(40), Duration::from_secs(60));
    }

    #[test]
    fn test_success_after_transient_failures() {
        let policy = RetryPolicy::immediate(5);
        let mut calls = 0;
        let result = policy.run(|_| {
            calls += 1;
            if calls < 3 {
                Err(FetchError::Status { code: 503 })
            } else {
                Ok("page")
            }
        });
        assert_eq!(result, Ok("page"));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_permanent_error_not_retried() {
        let policy = RetryPolicy::immediate(5);
        let mut calls = 0;
        let result: Result<(), _> = policy.run(|_| {
            calls += 1;
            Err(FetchError::Status { code: 401 })
        });
        assert_eq!(result, Err(FetchError::Status { code: 401 }));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_rate_limited_is_retried() {
        let policy = RetryPolicy::immediate(3);
        let mut attempts = Vec::new();
        let result = policy.run(|attempt| {
            attempts.push(attempt);
            if attempt == 1 {
                Err(FetchError::Status { code: 429 })
            } else {
                Ok(attempt)
            }
        });
        assert_eq!(result, Ok(2));
        assert_eq!(attempts, vec![1, 2]);
    }

    #[test]
    fn test_exhaustion_reports_last_error() {
        let policy = RetryPolicy::immediate(4);
        let mut calls = 0;
        let result: Result<(), _> = policy.run(|_| {
            calls += 1;
            Err(FetchError::Transport("connection refused".into()))
        });
        assert_eq!(calls, 4);
        match result {
            Err(FetchError::RetriesExhausted { attempts, last }) => {
                assert_eq!(attempts, 4);
                assert_eq!(*last, FetchError::Transport("connection refused".into()));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_single_attempt_policy() {
        let policy = RetryPolicy::immediate(0);
        assert_eq!(policy.max_attempts, 1);
        let result: Result<(), _> = policy.run(|_| Err(FetchError::Status { code: 502 }));
        assert!(matches!(result, Err(FetchError::RetriesExhausted { attempts: 1, .. })));
    }
}
