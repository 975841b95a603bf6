//! Sliding-window request rate limiter
//!
//! Admits at most `limit` requests in any `window`. A request over the limit
//! blocks the calling thread until the oldest admitted request leaves the
//! window; nothing is ever dropped.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Requests admitted per window against the WooCommerce API
pub const DEFAULT_LIMIT: usize = 20;

/// Length of the rate-limit window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(1);

pub struct RateLimiter {
    limit: usize,
    window: Duration,
    /// Admission times of the most recent requests, oldest first
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting `limit` requests per `window`
    pub fn new(limit: usize, window: Duration) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            window,
            admitted: Mutex::new(VecDeque::with_capacity(limit)),
        }
    }

    /// Block until a request may be issued
    ///
    /// Returns how long the caller was held back.
    pub fn acquire(&self) -> Duration {
        let delay = self.reserve(Instant::now());
        if !delay.is_zero() {
            log::debug!("Rate limit reached, waiting {:?}", delay);
            std::thread::sleep(delay);
        }
        delay
    }

    /// Claim the next admission slot as of `now`, returning the wait needed
    ///
    /// The slot is recorded at `now + wait`, so a caller that reserves and
    /// then sleeps for the returned duration stays within the limit.
    pub fn reserve(&self, now: Instant) -> Duration {
        let mut admitted = match self.admitted.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let delay = if admitted.len() >= self.limit {
            let oldest = admitted.pop_front().unwrap_or(now);
            (oldest + self.window).saturating_duration_since(now)
        } else {
            Duration::ZERO
        };

        admitted.push_back(now + delay);
        delay
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_WINDOW)
    }
}
