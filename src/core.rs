//! Rate-limited, retrying HTTP core for SEC endpoints.
//!
//! [`SecClient`] is the single gateway for every outbound request the pipeline
//! makes. It enforces a minimum interval between requests, retries transient
//! failures with exponential backoff, and rejects oversized responses. A 404
//! is returned to callers as a status rather than an error, because several
//! EDGAR lookups treat "not there" as a routing signal (e.g. the
//! `FilingSummary.xml` name-case fallback).

use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware, state::InMemoryState,
    state::NotKeyed,
};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::config::ClientConfig;
use super::error::{Result, StatementError};

const MAX_ATTEMPTS: u32 = 7;
const INITIAL_BACKOFF_MS: u64 = 1000;
const MAX_BACKOFF_MS: u64 = 16_000;

/// HTTP statuses that warrant a retry with backoff.
const RETRYABLE: [u16; 5] = [429, 500, 502, 503, 504];

const ACCEPT_HEADER: &str = "application/json, text/html, application/xml;q=0.9, */*;q=0.8";

type Governor = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// HTTP client for SEC.gov with built-in rate limiting and retry logic.
///
/// The SEC asks automated systems to identify themselves and keep request
/// rates modest. The client takes a mandatory user agent, spaces requests at
/// least `min_interval` apart (the wait happens before every attempt, so
/// retries observe the interval too), and backs off exponentially from 1 s up
/// to 16 s on transient failures.
///
/// Cloning is cheap; clones share the same limiter, so parallel users of one
/// client still observe a single request stream. Independent CIK runs that
/// should not share a limiter need independent clients.
#[derive(Debug, Clone)]
pub struct SecClient {
    client: reqwest::Client,
    rate_limiter: Arc<Governor>,
    max_bytes: usize,
    submissions_url: String,
    archives_url: String,
}

/// Raw outcome of a fetch: terminal status (200 or 404) plus the body.
#[derive(Debug)]
pub(crate) struct Fetched {
    pub status: u16,
    pub body: Vec<u8>,
}

impl SecClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::ConfigError` if the user agent is empty or
    /// malformed, the minimum interval is not positive, or the underlying HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let ua = config.user_agent.trim();
        if ua.is_empty() {
            return Err(StatementError::ConfigError(
                "User-Agent is required; identify your app and a contact email".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(ua)
                .map_err(|e| StatementError::ConfigError(format!("Invalid user agent: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                StatementError::ConfigError(format!("Failed to build HTTP client: {e}"))
            })?;

        let quota = Quota::with_period(config.min_interval).ok_or_else(|| {
            StatementError::ConfigError("min_interval must be greater than zero".to_string())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            client,
            rate_limiter,
            max_bytes: config.max_bytes,
            submissions_url: config.base_urls.submissions,
            archives_url: config.base_urls.archives,
        })
    }

    /// Backoff for the given 0-indexed attempt: 1 s doubling, ±20% jitter,
    /// capped at 16 s.
    fn backoff(attempt: u32) -> Duration {
        let base_ms = INITIAL_BACKOFF_MS
            .saturating_mul(2_u64.saturating_pow(attempt))
            .min(MAX_BACKOFF_MS);
        let jitter = (base_ms as f64 * 0.2 * (fastrand::f64() - 0.5)) as i64;
        let ms = ((base_ms as i64 + jitter) as u64).min(MAX_BACKOFF_MS);
        Duration::from_millis(ms)
    }

    /// Core fetch loop. Terminal outcomes are a 200 body, a 404 signal, an
    /// oversized response, or a non-retryable status; everything else retries
    /// with backoff up to [`MAX_ATTEMPTS`].
    pub(crate) async fn fetch(&self, url: &str) -> Result<Fetched> {
        let mut last_err: Option<StatementError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let wait = Self::backoff(attempt - 1);
                tracing::warn!(
                    "Retrying {} (attempt {}/{}) after {:?}",
                    url,
                    attempt + 1,
                    MAX_ATTEMPTS,
                    wait
                );
                sleep(wait).await;
            }

            // The limiter gates every attempt, so retries also observe the
            // minimum interval.
            self.rate_limiter.until_ready().await;

            let response = match self.client.get(url).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_err = Some(StatementError::RequestError(e));
                    continue;
                }
            };

            let status = response.status();
            match status {
                StatusCode::OK => {
                    let body = response.bytes().await.map_err(StatementError::RequestError)?;
                    if body.len() > self.max_bytes {
                        return Err(StatementError::ResponseTooLarge {
                            url: url.to_string(),
                            size: body.len(),
                        });
                    }
                    tracing::debug!("Fetched {} ({} bytes)", url, body.len());
                    return Ok(Fetched {
                        status: 200,
                        body: body.to_vec(),
                    });
                }
                StatusCode::NOT_FOUND => {
                    return Ok(Fetched {
                        status: 404,
                        body: Vec::new(),
                    });
                }
                s if RETRYABLE.contains(&s.as_u16()) => {
                    last_err = Some(StatementError::InvalidResponse {
                        status: s.as_u16(),
                        url: url.to_string(),
                    });
                    continue;
                }
                s => {
                    return Err(StatementError::InvalidResponse {
                        status: s.as_u16(),
                        url: url.to_string(),
                    });
                }
            }
        }

        Err(last_err.unwrap_or(StatementError::NotFound))
    }

    /// Fetches a URL and returns `(status, text)` where status is 200 or 404.
    ///
    /// The body is decoded as UTF-8 with replacement; EDGAR HTML is served as
    /// UTF-8 or ASCII in practice.
    pub async fn get_text(&self, url: &str) -> Result<(u16, String)> {
        let fetched = self.fetch(url).await?;
        Ok((
            fetched.status,
            String::from_utf8_lossy(&fetched.body).into_owned(),
        ))
    }

    /// Fetches a URL and returns `(status, bytes)` where status is 200 or 404.
    pub async fn get_bytes(&self, url: &str) -> Result<(u16, Vec<u8>)> {
        let fetched = self.fetch(url).await?;
        Ok((fetched.status, fetched.body))
    }

    /// Fetches and deserializes a JSON resource. A 404 becomes
    /// `StatementError::NotFound`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let fetched = self.fetch(url).await?;
        if fetched.status != 200 {
            return Err(StatementError::NotFound);
        }
        Ok(serde_json::from_slice(&fetched.body)?)
    }

    /// Base URL of the submissions API.
    pub fn submissions_url(&self) -> &str {
        &self.submissions_url
    }

    /// Base URL of the archives service.
    pub fn archives_url(&self) -> &str {
        &self.archives_url
    }
}
