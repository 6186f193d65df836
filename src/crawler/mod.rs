//! Crawling of BBC edition listings and articles
//!
//! - [`url`]: article link classification per edition
//! - [`list`]: paginated category collector
//! - [`topics`]: topic discovery from article pages
//! - [`pipeline`]: collect, fetch and write one category
//! - [`fetcher`]: rate-limited HTTP fetcher

pub mod fetcher;
pub mod headers;
pub mod list;
pub mod pipeline;
pub mod topics;
pub mod url;

pub use fetcher::BbcFetcher;
pub use list::CategoryCollector;
pub use pipeline::CategoryPipeline;
pub use topics::TopicDiscovery;
pub use url::UrlClassifier;

use async_trait::async_trait;
use std::time::Duration;

use crate::utils::error::FetchError;

/// Source of page bodies
///
/// Implemented by [`BbcFetcher`]; the collector and pipeline only see this
/// trait, so one fetcher (and its rate limiter) is shared by every category.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the body as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fixed wait between consecutive page or article fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    enabled: bool,
    delay: Duration,
}

impl Pacing {
    #[must_use]
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            enabled: !delay.is_zero(),
            delay,
        }
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            delay: Duration::ZERO,
        }
    }

    /// `--no-time-delay` switches pacing off whatever the configured delay
    #[must_use]
    pub const fn from_flag(delay: Duration, no_time_delay: bool) -> Self {
        if no_time_delay {
            Self::disabled()
        } else {
            Self::fixed(delay)
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleep for the configured delay when pacing is on
    pub async fn wait(&self) {
        if self.enabled {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(10))
    }
}
