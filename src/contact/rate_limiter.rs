//! Soft per-session throttle on contact form submissions.
//!
//! A fixed-window counter with lazy purge: every check first drops the
//! records that have aged out of the window, then admits the submission only
//! while fewer than `max_submissions` records remain. This is a UX throttle,
//! not a security control.

use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    pub max_submissions: usize,
    pub window: Duration,
}

impl RateLimiterConfig {
    pub const DEFAULT_MAX_SUBMISSIONS: usize = 3;
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5 * 60);

    pub fn new(max_submissions: usize, window: Duration) -> Self {
        Self {
            max_submissions,
            window,
        }
    }

    fn window_millis(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SUBMISSIONS, Self::DEFAULT_WINDOW)
    }
}

/// Accepted-submission timestamps (ms since the epoch), oldest first.
#[derive(Debug, Clone, Default)]
pub struct SubmissionRateLimiter {
    config: RateLimiterConfig,
    records: VecDeque<i64>,
}

impl SubmissionRateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            records: VecDeque::new(),
        }
    }

    pub fn config(&self) -> RateLimiterConfig {
        self.config
    }

    /// Admit a submission at `now_millis` if the window has room.
    ///
    /// A rejected submission is not recorded.
    pub fn try_acquire(&mut self, now_millis: i64) -> bool {
        self.purge(now_millis);

        if self.records.len() >= self.config.max_submissions {
            return false;
        }

        self.records.push_back(now_millis);
        true
    }

    /// Slots left at `now_millis`, without recording anything.
    pub fn remaining(&mut self, now_millis: i64) -> usize {
        self.purge(now_millis);
        self.config.max_submissions.saturating_sub(self.records.len())
    }

    /// Records kept after the last purge.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // A record exactly `window` old still counts; it expires one ms later.
    fn purge(&mut self, now_millis: i64) {
        let window = self.config.window_millis();
        // Wall-clock timestamps may go backwards; not sorted.
        self.records
            .retain(|&recorded| now_millis.saturating_sub(recorded) <= window);
    }
}
