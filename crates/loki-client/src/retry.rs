//! Retry policy with exponential backoff.

use std::time::Duration;

/// Number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay of the exponential backoff.
pub const DEFAULT_BACKOFF_FACTOR: Duration = Duration::from_secs(1);

/// Upper bound for a single backoff delay.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Statuses treated as transient.
pub const DEFAULT_RETRY_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Statuses whose `Retry-After` header is honoured.
const RETRY_AFTER_STATUSES: [u16; 3] = [413, 429, 503];

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each following retry.
    pub backoff_factor: Duration,
    /// Maximum delay between retries.
    pub max_backoff: Duration,
    /// Response statuses that trigger a retry.
    pub status_forcelist: Vec<u16>,
    /// Whether to respect Retry-After headers.
    pub respect_retry_after: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_backoff: DEFAULT_MAX_BACKOFF,
            status_forcelist: DEFAULT_RETRY_STATUSES.to_vec(),
            respect_retry_after: true,
        }
    }
}

impl RetryConfig {
    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the backoff factor.
    pub fn with_backoff_factor(mut self, factor: Duration) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Set the maximum backoff delay.
    pub fn with_max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }

    /// Replace the set of retryable statuses.
    pub fn with_status_forcelist(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.status_forcelist = statuses.into_iter().collect();
        self
    }

    /// Enable or disable honouring Retry-After headers.
    pub fn with_respect_retry_after(mut self, respect: bool) -> Self {
        self.respect_retry_after = respect;
        self
    }

    /// Disable retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Returns true if a response with this status should be retried.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.status_forcelist.contains(&status)
    }

    /// Backoff delay before retry number `attempt` (0-indexed):
    /// `backoff_factor * 2^attempt`, capped at `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|multiplier| self.backoff_factor.checked_mul(multiplier))
            .map_or(self.max_backoff, |delay| std::cmp::min(delay, self.max_backoff))
    }
}

/// Retry state for a single request.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    attempt: u32,
}

impl RetryPolicy {
    /// Create a new retry policy from config.
    pub fn new(config: RetryConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Number of retries consumed so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns true if another retry is allowed.
    pub fn should_retry(&self) -> bool {
        self.attempt < self.config.max_retries
    }

    /// Returns true if a response with this status should be retried.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.config.is_retryable_status(status)
    }

    /// Record a retry and return the delay to wait before it.
    /// Returns None once retries are exhausted.
    ///
    /// `retry_after` is only honoured for 413, 429 and 503 responses.
    pub fn next_delay(
        &mut self,
        status: Option<u16>,
        retry_after: Option<Duration>,
    ) -> Option<Duration> {
        if !self.should_retry() {
            return None;
        }

        let honour_header = self.config.respect_retry_after
            && status.is_some_and(|s| RETRY_AFTER_STATUSES.contains(&s));

        let delay = match retry_after {
            Some(retry_after) if honour_header => {
                std::cmp::min(retry_after, self.config.max_backoff)
            }
            _ => self.config.backoff(self.attempt),
        };

        self.attempt += 1;
        Some(delay)
    }
}
