//! Cache orchestration settings.

use std::time::Duration;

/// Configuration for [`BarCache`](crate::BarCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Seconds added on both sides of a gap outside the open session.
    pub closed_session_buffer: i64,
    /// Upper bound on one gap's origin fetch; expiry counts as a failure.
    pub fetch_timeout: Duration,
    /// Maximum number of gaps fetched concurrently.
    pub concurrency: usize,
}

impl CacheConfig {
    /// One day plus one second.
    pub const DEFAULT_CLOSED_SESSION_BUFFER: i64 = 86_401;

    /// Sets the closed-session buffer in seconds.
    #[must_use]
    pub const fn with_closed_session_buffer(mut self, secs: i64) -> Self {
        self.closed_session_buffer = secs;
        self
    }

    /// Sets the per-gap fetch timeout.
    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Sets the gap concurrency. Zero is treated as one.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = if concurrency == 0 { 1 } else { concurrency };
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            closed_session_buffer: Self::DEFAULT_CLOSED_SESSION_BUFFER,
            fetch_timeout: Duration::from_secs(60),
            concurrency: 4,
        }
    }
}
