//! Configuration management for the tafiti crawler
//!
//! Configuration is loaded once at startup from `config.toml` (every section
//! optional), patched from environment variables and validated. The resulting
//! value is immutable and handed to the classifier, collector and writers.

pub mod editions;

pub use editions::{default_editions, DigitCheck, EditionConfig, BBC_ORIGIN};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::error::CrawlerError;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// CSS classes of the page elements the crawler reads
    pub selectors: SelectorConfig,

    /// Output configuration
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Language editions
    pub editions: Vec<EditionConfig>,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Rate limit (requests per second) shared by all categories
    pub rate_limit: u32,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Pause between consecutive page or article fetches, in seconds
    pub page_delay_secs: u64,

    /// Fixed User-Agent; a browser UA is rotated when unset
    pub user_agent: Option<String>,

    /// Enable cookie persistence
    pub enable_cookies: bool,
}

/// Classes of the elements read from listing and article pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Class of the `ul` holding pagination links
    pub pagination_list_class: String,

    /// Classes of the `li` topic entries on article pages, tried in order
    pub topic_list_classes: Vec<String>,

    /// Classes of the `h1` headline, tried in order
    pub headline_classes: Vec<String>,

    /// Classes of the `strong` headline used when no `h1` matches
    pub headline_fallback_classes: Vec<String>,

    /// Class of the `div` elements holding story paragraphs
    pub story_div_class: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Merged corpus path; per-category files are written next to it
    pub output_file_name: PathBuf,

    /// Remove per-category files after merging
    pub cleanup: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Built-in defaults patched from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path` when given, else from `./config.toml` when present,
    /// else built-in defaults; then apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let default_file = Path::new("config.toml");
        let file = path.or_else(|| default_file.exists().then_some(default_file));

        let config = match file {
            Some(file) => {
                let mut config = Self::from_file(file)?;
                config.apply_env_overrides();
                config
            }
            None => Self::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Override values from `TAFITI_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        if let Some(rate) = env_parse::<u32>("TAFITI_RATE_LIMIT") {
            self.crawler.rate_limit = rate;
        }
        if let Some(secs) = env_parse::<u64>("TAFITI_REQUEST_TIMEOUT") {
            self.crawler.request_timeout_secs = secs;
        }
        if let Some(secs) = env_parse::<u64>("TAFITI_PAGE_DELAY") {
            self.crawler.page_delay_secs = secs;
        }
        if let Ok(ua) = std::env::var("TAFITI_USER_AGENT") {
            self.crawler.user_agent = Some(ua);
        }
        if let Ok(level) = std::env::var("TAFITI_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TAFITI_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.crawler.rate_limit == 0 {
            anyhow::bail!("rate_limit must be greater than 0");
        }

        if self.crawler.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.selectors.pagination_list_class.trim().is_empty() {
            anyhow::bail!("selectors.pagination_list_class must not be empty");
        }

        if self.selectors.story_div_class.trim().is_empty() {
            anyhow::bail!("selectors.story_div_class must not be empty");
        }

        if self.editions.is_empty() {
            anyhow::bail!("at least one edition must be configured");
        }

        let mut codes = HashSet::new();
        for edition in &self.editions {
            validate_edition(edition)?;
            for code in std::iter::once(&edition.code).chain(&edition.aliases) {
                if !codes.insert(code.to_lowercase()) {
                    anyhow::bail!("edition code or alias `{code}` is used twice");
                }
            }
        }

        Ok(())
    }

    /// Look up an edition by code, alias or path name
    pub fn edition(&self, code: &str) -> Result<&EditionConfig, CrawlerError> {
        self.editions
            .iter()
            .find(|e| e.matches(code))
            .ok_or_else(|| CrawlerError::UnknownEdition {
                code: code.to_string(),
                valid: self
                    .editions
                    .iter()
                    .map(|e| e.code.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Get the pacing delay as Duration
    #[must_use]
    pub fn page_delay(&self) -> Duration {
        Duration::from_secs(self.crawler.page_delay_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

fn validate_edition(edition: &EditionConfig) -> Result<()> {
    if edition.code.trim().is_empty() {
        anyhow::bail!("edition code must not be empty");
    }

    let origin = url::Url::parse(&edition.origin)
        .with_context(|| format!("edition {}: invalid origin {}", edition.code, edition.origin))?;
    if !matches!(origin.scheme(), "http" | "https") || edition.origin.ends_with('/') {
        anyhow::bail!(
            "edition {}: origin must be http(s) without trailing slash",
            edition.code
        );
    }

    if edition.section_prefixes.is_empty() {
        anyhow::bail!("edition {}: section_prefixes must not be empty", edition.code);
    }

    let prefixes = std::iter::once(&edition.prefix)
        .chain(&edition.article_prefixes)
        .chain(&edition.section_prefixes)
        .chain(&edition.exclusion_prefixes);
    for prefix in prefixes {
        if !prefix.starts_with('/') {
            anyhow::bail!(
                "edition {}: prefix `{prefix}` must start with '/'",
                edition.code
            );
        }
    }

    Ok(())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            selectors: SelectorConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            editions: default_editions(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            rate_limit: 2,
            request_timeout_secs: 30,
            page_delay_secs: 10,
            user_agent: None,
            enable_cookies: true,
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            pagination_list_class: "bbc-1hz4f7k".to_string(),
            topic_list_classes: vec!["bbc-1msyfg1 e1hq59l0".to_string(), "bbc-1rvqdin".to_string()],
            headline_classes: vec!["bbc-1gvwz1w e1p3vdyi0".to_string(), "bbc-1tk77pb e1p3vdyi0".to_string()],
            headline_fallback_classes: vec!["ewk8wmc0 bbc-1tk77pb".to_string()],
            story_div_class: "bbc-19j92fr ebmt73l0".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_file_name: PathBuf::from("data/bbc_pidgin_corpus.tsv"),
            cleanup: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_rate_limit() {
        let mut config = Config::default();
        config.crawler.rate_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_page_delay_conversion() {
        let config = Config::default();
        assert_eq!(config.page_delay(), Duration::from_secs(10));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let mut config = Config::default();
        config.editions[1].aliases.push("af".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_prefix_rejected() {
        let mut config = Config::default();
        config.editions[0].exclusion_prefixes.push("afrique/x".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_edition_lookup() {
        let config = Config::default();
        assert_eq!(config.edition("sw").unwrap().code, "swa");
        assert_eq!(config.edition("yoruba").unwrap().code, "yor");
        let err = config.edition("klingon").unwrap_err();
        assert!(err.to_string().contains("pcm"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [crawler]
            page_delay_secs = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.crawler.page_delay_secs, 0);
        assert_eq!(config.crawler.rate_limit, 2);
        assert_eq!(config.editions.len(), 11);
    }
}
