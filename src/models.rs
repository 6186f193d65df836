// Core data structures for the tafiti crawler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Name of the category whose listing only ever holds ten stories
pub const MOST_POPULAR: &str = "MOST_POPULAR";

/// Number of stories on the most-popular listing
const MOST_POPULAR_SIZE: i64 = 10;

/// Where a category came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    /// Configured for the edition
    Static,
    /// Found in the topic list of an article page
    Discovered,
}

/// One listing to crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Absolute seed URL of the first listing page
    pub url: String,
    pub source: CategorySource,
}

impl Category {
    pub fn new(name: impl Into<String>, url: impl Into<String>, source: CategorySource) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            source,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Optional cap on the number of URLs (and written articles) per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quota(Option<usize>);

impl Quota {
    /// Crawl until pagination is exhausted
    #[must_use]
    pub const fn unbounded() -> Self {
        Self(None)
    }

    /// Cap at `n`; zero means unbounded
    #[must_use]
    pub const fn at_most(n: usize) -> Self {
        if n == 0 {
            Self(None)
        } else {
            Self(Some(n))
        }
    }

    /// Build from the command-line value, where `-1` (any value <= 0) means unbounded
    #[must_use]
    pub fn from_arg(n: i64) -> Self {
        usize::try_from(n).map_or(Self(None), Self::at_most)
    }

    /// Per-category quota for a total article budget
    ///
    /// Without `spread` every category gets the full budget. With `spread`
    /// the budget is divided across categories; when the most-popular listing
    /// is among them its ten stories are taken off the top first. Never
    /// returns less than one article per category.
    #[must_use]
    pub fn per_category(total: i64, spread: bool, categories: &[Category]) -> Self {
        if total <= 0 || !spread || categories.is_empty() {
            return Self::from_arg(total);
        }

        let count = categories.len() as i64;
        let has_popular = categories.iter().any(|c| c.name == MOST_POPULAR);

        let share = if has_popular && count > 1 {
            (total - MOST_POPULAR_SIZE).div_euclid(count - 1)
        } else {
            (total as f64 / count as f64).round_ties_even() as i64
        };

        Self::from_arg(share.max(1))
    }

    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.0
    }

    /// True when a set of `len` URLs or rows meets the cap
    #[must_use]
    pub fn is_satisfied_by(&self, len: usize) -> bool {
        self.0.is_some_and(|limit| len >= limit)
    }
}

impl std::fmt::Display for Quota {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(limit) => write!(f, "{limit}"),
            None => write!(f, "unbounded"),
        }
    }
}

/// A later listing page that failed; URLs gathered before it are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialFailure {
    pub page: u32,
    pub url: String,
    pub reason: String,
}

/// Deduplicated article URLs of one category crawl, in first-seen order
#[derive(Debug, Clone, Default, Serialize)]
pub struct UrlSet {
    urls: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
    pages_fetched: u32,
    total_pages: u32,
    partial: Option<PartialFailure>,
}

impl UrlSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a URL; returns false when it was already present
    pub fn insert(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.urls.push(url);
        true
    }

    /// Insert many URLs; returns how many were new
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, urls: I) -> usize {
        urls.into_iter().filter(|url| self.insert(url.clone())).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.urls
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.urls
    }

    /// Listing pages fetched successfully
    #[must_use]
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Page count announced by the first listing page
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Set when a later listing page failed and the crawl stopped early
    #[must_use]
    pub fn partial(&self) -> Option<&PartialFailure> {
        self.partial.as_ref()
    }

    pub(crate) fn record_page(&mut self) {
        self.pages_fetched += 1;
    }

    pub(crate) fn set_total_pages(&mut self, total: u32) {
        self.total_pages = total;
    }

    pub(crate) fn mark_partial(&mut self, failure: PartialFailure) {
        self.partial = Some(failure);
    }
}

/// Headline and story text of one article page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArticle {
    pub headline: Option<String>,
    /// Paragraphs joined by single spaces; `None` when the page has no story
    pub text: Option<String>,
    pub url: String,
}

/// How a category crawl ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryStatus {
    /// Pagination walked to the end or quota met
    Complete,
    /// A later listing page failed; rows were written from the URLs found before it
    Partial { page: u32, reason: String },
    /// The category produced no output
    Failed { reason: String },
}

/// Outcome of one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: String,
    pub urls_found: usize,
    pub pages_fetched: u32,
    pub rows_written: usize,
    pub articles_skipped: usize,
    pub status: CategoryStatus,
    /// Partition written by this run, `None` when nothing was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<PathBuf>,
}

impl CategoryReport {
    /// Report for a category that failed before writing anything
    pub fn failed(category: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            urls_found: 0,
            pages_fetched: 0,
            rows_written: 0,
            articles_skipped: 0,
            status: CategoryStatus::Failed {
                reason: reason.into(),
            },
            partition: None,
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.status, CategoryStatus::Failed { .. })
    }
}

/// Whole-run summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub edition: String,
    pub quota_per_category: Quota,
    pub categories: Vec<CategoryReport>,
    pub merged_rows: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.categories.iter().map(|c| c.rows_written).sum()
    }

    #[must_use]
    pub fn failed_categories(&self) -> usize {
        self.categories.iter().filter(|c| c.is_failed()).count()
    }

    #[must_use]
    pub fn duration_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}
