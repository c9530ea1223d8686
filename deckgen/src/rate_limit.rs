//! Sliding-window request limiter keyed by caller identity.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{Error, Result};

/// Callers tracked before idle entries are swept.
const SWEEP_THRESHOLD: usize = 1024;

/// Allows at most `limit` requests per caller within any `window`.
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    /// A limiter with a one-minute window. A limit of zero disables it.
    #[must_use]
    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// A limiter with an arbitrary window.
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit: limit as usize,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Whether requests are limited at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.limit > 0
    }

    /// Record a request from `caller`.
    ///
    /// Rejected requests are not recorded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RateLimited`] if `caller` already used its budget in
    /// the current window.
    pub fn check(&self, caller: &str) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);

        if hits.len() >= SWEEP_THRESHOLD {
            hits.retain(|_, times| {
                Self::prune(times, now, self.window);
                !times.is_empty()
            });
        }

        let times = hits.entry(caller.to_owned()).or_default();
        Self::prune(times, now, self.window);

        if times.len() >= self.limit {
            tracing::debug!(caller, limit = self.limit, "Rate limit exceeded");
            return Err(Error::RateLimited);
        }

        times.push_back(now);
        Ok(())
    }

    fn prune(times: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while times
            .front()
            .is_some_and(|t| now.duration_since(*t) >= window)
        {
            times.pop_front();
        }
    }
}
