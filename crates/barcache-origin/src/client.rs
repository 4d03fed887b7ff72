//! HTTP client for fetching bars from the origin.

use async_trait::async_trait;
use barcache_core::OriginGateway;
use barcache_types::{Bar, BarSet, OriginError, TimeRange};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::parse::{clip_bars, decode_bars};
use crate::url::bars_url;

/// Configuration for the origin client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Idle connections kept per host.
    pub concurrency: usize,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for failed requests.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(60),
            max_retries: 5,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
            user_agent: format!("barcache/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Sets the pooled connection count.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff bounds in milliseconds.
    #[must_use]
    pub const fn with_backoff(mut self, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Calculates the backoff delay with exponential backoff and jitter.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        // base_delay * 2^attempt, capped
        let exp_delay = self.base_delay_ms.saturating_mul(1u64 << attempt.min(10));
        let capped_delay = exp_delay.min(self.max_delay_ms);

        // Deterministic jitter within ±25%
        let jitter_range = capped_delay / 4;
        let final_delay = if jitter_range > 0 {
            let offset = (u64::from(attempt) * 17) % (jitter_range * 2);
            (capped_delay + offset).saturating_sub(jitter_range)
        } else {
            capped_delay
        };

        Duration::from_millis(final_delay.max(100))
    }

    /// Returns the longest one fetch can take when every retry is used.
    ///
    /// Each attempt may run to the request timeout and every retry waits
    /// its backoff delay first.
    #[must_use]
    pub fn retry_budget(&self) -> Duration {
        let backoff: Duration = (1..=self.max_retries)
            .map(|attempt| self.backoff_delay(attempt))
            .sum();
        self.timeout
            .saturating_mul(self.max_retries.saturating_add(1))
            .saturating_add(backoff)
    }
}

/// [`OriginGateway`] over HTTP with connection pooling and retry logic.
#[derive(Debug, Clone)]
pub struct HttpOrigin {
    client: Client,
    base_url: Url,
    config: ClientConfig,
}

impl HttpOrigin {
    /// Creates an origin client for `base_url` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OriginError::Request`] if the URL is not an absolute
    /// `http`/`https` URL or the HTTP client cannot be created.
    pub fn new(base_url: &str, config: ClientConfig) -> Result<Self, OriginError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| OriginError::Request(format!("invalid origin URL '{base_url}': {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(OriginError::Request(format!(
                "origin URL must be http(s): {base_url}"
            )));
        }

        let client = Client::builder()
            .pool_max_idle_per_host(config.concurrency)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| OriginError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// See [`HttpOrigin::new`].
    pub fn with_defaults(base_url: &str) -> Result<Self, OriginError> {
        Self::new(base_url, ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Downloads one response body.
    ///
    /// Returns `Ok(None)` if the origin answers 404.
    async fn download(&self, url: &Url) -> Result<Option<Vec<u8>>, OriginError> {
        let mut attempts = 0;

        loop {
            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::NOT_FOUND {
                        return Ok(None);
                    }

                    // Retry on server errors (5xx) and rate limiting (429)
                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            let delay = self.config.backoff_delay(attempts);
                            warn!(%status, attempt = attempts, ?delay, "origin busy, retrying");
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        return Err(OriginError::Status {
                            status: status.as_u16(),
                        });
                    }

                    if !status.is_success() {
                        return Err(OriginError::Status {
                            status: status.as_u16(),
                        });
                    }

                    let body = response.bytes().await.map_err(|e| self.map_error(&e))?;
                    return Ok(Some(body.to_vec()));
                }
                Err(e) if is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.config.backoff_delay(attempts);
                    warn!(error = %e, attempt = attempts, ?delay, "origin request failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(self.map_error(&e)),
            }
        }
    }

    fn map_error(&self, error: &reqwest::Error) -> OriginError {
        if error.is_timeout() {
            OriginError::Timeout(self.config.timeout)
        } else {
            OriginError::Request(error.to_string())
        }
    }
}

/// Determines if an error is retryable.
fn is_retryable_error(error: &reqwest::Error) -> bool {
    // Builder errors are configuration issues
    if error.is_builder() {
        return false;
    }
    error.is_timeout() || error.is_connect() || error.is_request()
}

#[async_trait]
impl OriginGateway for HttpOrigin {
    async fn fetch_bars(&self, bar_set: &BarSet, range: TimeRange) -> Result<Vec<Bar>, OriginError> {
        let url = bars_url(&self.base_url, bar_set, range);
        debug!(%url, "requesting bars");

        let bars = match self.download(&url).await? {
            Some(body) => decode_bars(&body)?,
            None => Vec::new(),
        };

        Ok(clip_bars(bars, range))
    }
}
