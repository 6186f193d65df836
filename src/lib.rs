//! tafiti - BBC World Service language-edition news crawler
//!
//! Builds plain-text news corpora for African languages from the BBC
//! language editions (Hausa, Yoruba, Swahili, Pidgin and others).
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration and the per-edition prefix tables
//! - [`crawler`] - Link classification, paginated collection and fetching
//! - [`parser`] - HTML parsing and data extraction
//! - [`models`] - Core data structures and types
//! - [`storage`] - Per-category TSV files and the merged corpus
//! - [`utils`] - Common utilities and error types
//!
//! # Example
//!
//! ```
//! use tafiti::config::Config;
//! use tafiti::crawler::url::classify;
//!
//! let config = Config::default();
//! let afrique = config.edition("afr").unwrap();
//! assert!(classify(afrique, "/afrique/region-45"));
//! assert!(!classify(afrique, "/afrique/topics/c456"));
//! ```

pub mod config;
pub mod crawler;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, EditionConfig};
    pub use crate::crawler::{
        BbcFetcher, CategoryCollector, CategoryPipeline, Pacing, PageFetcher, TopicDiscovery,
        UrlClassifier,
    };
    pub use crate::models::{Category, CategoryReport, CrawlSummary, ParsedArticle, Quota, UrlSet};
    pub use crate::parser::ArticleParser;
    pub use crate::storage::{CategoryWriter, CorpusPaths, CorpusRow};
    pub use crate::utils::error::{CrawlerError, FetchError, ParseError, StorageError};
}

// Direct re-exports for convenience
pub use models::{Category, ParsedArticle, Quota, UrlSet};
