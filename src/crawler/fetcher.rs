//! HTTP fetcher for BBC edition pages
//!
//! Features:
//! - User-Agent rotation (unless a fixed agent is configured)
//! - Rate limiting with governor, shared by every category task
//! - Edition-specific Accept-Language and Referer headers
//!
//! Failed requests are reported, never retried.

use crate::config::{CrawlerConfig, EditionConfig};
use crate::crawler::headers::{accept_language, build_browser_headers};
use crate::crawler::PageFetcher;
use crate::utils::error::FetchError;
use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use rand::seq::SliceRandom;
use reqwest::Client;
use std::num::NonZeroU32;
use std::time::Duration;

/// Pool of realistic User-Agent strings for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
];

/// Rate-limited fetcher for one edition
pub struct BbcFetcher {
    /// HTTP client with configured timeout, compression and cookie store
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Fixed User-Agent; rotated from the pool when `None`
    user_agent: Option<String>,

    /// Referer sent with every request
    referer: String,

    accept_language: String,
}

impl BbcFetcher {
    /// Create a fetcher from the crawler settings of an edition
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &CrawlerConfig, edition: &EditionConfig) -> Result<Self, FetchError> {
        Self::with_rate(
            config.rate_limit,
            Duration::from_secs(config.request_timeout_secs),
            config.enable_cookies,
            edition,
        )
        .map(|fetcher| fetcher.with_user_agent(config.user_agent.clone()))
    }

    /// Create a fetcher with explicit rate and timeout
    ///
    /// # Arguments
    ///
    /// * `requests_per_second` - Maximum number of requests per second; zero is treated as one
    /// * `timeout` - Request timeout duration
    /// * `cookies` - Keep a cookie store across requests
    /// * `edition` - Edition whose homepage and language shape the headers
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_rate(
        requests_per_second: u32,
        timeout: Duration,
        cookies: bool,
        edition: &EditionConfig,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .cookie_store(cookies)
            .build()?;

        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            user_agent: None,
            referer: edition.homepage(),
            accept_language: accept_language(&edition.language_tag),
        })
    }

    /// Use a fixed User-Agent instead of rotating
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Fetch a page body as text
    ///
    /// # Errors
    ///
    /// - `FetchError::InvalidUrl` when `url` does not parse
    /// - `FetchError::Timeout` when the request times out
    /// - `FetchError::Status` on any non-2xx answer
    /// - `FetchError::Http` on other transport failures
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let parsed = url::Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        self.rate_limiter.until_ready().await;

        let headers =
            build_browser_headers(self.user_agent(), &self.referer, &self.accept_language)?;

        tracing::debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(parsed)
            .headers(headers)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(classify_transport_error)
    }

    fn user_agent(&self) -> &str {
        match &self.user_agent {
            Some(agent) => agent,
            None => random_user_agent(),
        }
    }
}

#[async_trait]
impl PageFetcher for BbcFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_text(url).await
    }
}

fn classify_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Http(error)
    }
}

/// Get a random user agent from the pool
fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
}
