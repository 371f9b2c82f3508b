//! Page fetching with politeness delays and exponential backoff.
//!
//! This module is the only place that talks to the network. It is split into
//! two layers so the retry behaviour can be exercised without a server:
//!
//! - [`Transport`]: performs exactly one GET and returns the body or an error
//! - [`Fetcher`]: wraps any [`Transport`] with the delay/retry policy and
//!   parses the body into a [`scraper::Html`] document
//!
//! # Retry Strategy
//!
//! For `max_retries = N`:
//! - a random delay from `delay_range` is slept before *every* attempt
//! - after failed attempt `k` (0-indexed, `k < N - 1`) the fetcher sleeps
//!   `backoff_unit * 2^k`
//! - after the N-th failure the fetch gives up and returns `None`
//!
//! Giving up is never an error for the caller; it is logged and the scraper
//! carries on with whatever else it can fetch.

use rand::{Rng, rng};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use scraper::Html;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Desktop browser user agent sent unless the caller overrides headers.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("invalid fetch policy: {0}")]
    InvalidPolicy(String),
}

/// The default header set: `User-Agent` and `Accept-Language`.
pub fn default_headers() -> Vec<(String, String)> {
    vec![
        ("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string()),
        ("Accept-Language".to_string(), DEFAULT_ACCEPT_LANGUAGE.to_string()),
    ]
}

/// Timing and retry knobs shared by every request of a [`Fetcher`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    /// Total number of attempts per URL, including the first one.
    pub max_retries: usize,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Inclusive `(min, max)` range of the random delay before each attempt.
    pub delay_range: (Duration, Duration),
    /// Unit of the exponential backoff between attempts.
    pub backoff_unit: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout: Duration::from_secs(10),
            delay_range: (Duration::from_secs(1), Duration::from_secs(3)),
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl FetchPolicy {
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.max_retries == 0 {
            return Err(FetchError::InvalidPolicy(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(FetchError::InvalidPolicy(
                "timeout must be positive".to_string(),
            ));
        }
        let (min, max) = self.delay_range;
        if min > max {
            return Err(FetchError::InvalidPolicy(format!(
                "delay range minimum {min:?} exceeds maximum {max:?}"
            )));
        }
        Ok(())
    }
}

/// Sample a delay uniformly from the inclusive `(min, max)` range.
pub fn random_delay((min, max): (Duration, Duration)) -> Duration {
    if min >= max {
        return min;
    }
    let secs = rng().random_range(min.as_secs_f64()..=max.as_secs_f64());
    Duration::from_secs_f64(secs)
}

/// Backoff slept after failed attempt `attempt` (0-indexed): `unit * 2^attempt`.
pub fn backoff_delay(unit: Duration, attempt: usize) -> Duration {
    let factor = 2u32.saturating_pow(attempt.min(u32::MAX as usize) as u32);
    unit.saturating_mul(factor)
}

/// A single request/response exchange.
///
/// Implementors perform one attempt only; retrying is the job of [`Fetcher`].
pub trait Transport {
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// [`Transport`] backed by a shared `reqwest` client.
///
/// Headers and timeout are fixed when the client is built and apply to every
/// request it sends.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(headers: &[(String, String)], timeout: Duration) -> Result<Self, FetchError> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::InvalidHeader(format!("{name}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::InvalidHeader(format!("{name}: {e}")))?;
            header_map.insert(header_name, header_value);
        }

        let client = Client::builder()
            .default_headers(header_map)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Anything that can turn a URL into a parsed document.
///
/// `None` means the page could not be retrieved; implementors log why.
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Option<Html>;
}

/// Retrying fetcher over a [`Transport`].
pub struct Fetcher<T> {
    transport: T,
    policy: FetchPolicy,
}

impl<T> Fetcher<T>
where
    T: Transport,
{
    /// Wrap `transport` with `policy`, rejecting policies that cannot work.
    pub fn new(transport: T, policy: FetchPolicy) -> Result<Self, FetchError> {
        policy.validate()?;
        Ok(Self { transport, policy })
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }
}

impl Fetcher<HttpTransport> {
    /// Build a network-backed fetcher.
    ///
    /// `headers` replaces the [`default_headers`] entirely when given.
    pub fn http(
        headers: Option<Vec<(String, String)>>,
        policy: FetchPolicy,
    ) -> Result<Self, FetchError> {
        let headers = headers.unwrap_or_else(default_headers);
        let transport = HttpTransport::new(&headers, policy.timeout)?;
        Self::new(transport, policy)
    }
}

impl<T> fmt::Debug for Fetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("max_retries", &self.policy.max_retries)
            .field("timeout", &self.policy.timeout)
            .field("delay_range", &self.policy.delay_range)
            .field("backoff_unit", &self.policy.backoff_unit)
            .finish()
    }
}

impl<T> Fetch for Fetcher<T>
where
    T: Transport,
{
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Option<Html> {
        let max = self.policy.max_retries;

        for attempt in 0..max {
            sleep(random_delay(self.policy.delay_range)).await;

            let attempt_t0 = Instant::now();
            match self.transport.get(url).await {
                Ok(body) => {
                    debug!(
                        attempt = attempt + 1,
                        bytes = body.len(),
                        elapsed_ms = attempt_t0.elapsed().as_millis() as u64,
                        "Fetched page"
                    );
                    return Some(Html::parse_document(&body));
                }
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        max,
                        elapsed_ms = attempt_t0.elapsed().as_millis() as u64,
                        error = %e,
                        "Request failed"
                    );

                    if attempt + 1 == max {
                        error!(%url, attempts = max, "Failed to fetch page after exhausting retries");
                        return None;
                    }

                    let delay = backoff_delay(self.policy.backoff_unit, attempt);
                    debug!(?delay, "Backing off before retry");
                    sleep(delay).await;
                }
            }
        }

        None
    }
}
