//! Error types for the tafiti crawler
//!
//! This module defines custom error types used throughout the application.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("{url} answered with status {status}")]
    Status { status: u16, url: String },

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configured User-Agent or Referer is not a valid header value
    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

/// Errors that can occur during parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    /// A configured CSS class produced an unusable selector
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Selector configuration is missing a required class
    #[error("No class configured for {0}")]
    MissingClass(&'static str),
}

/// General crawler errors
#[derive(Error, Debug)]
pub enum CrawlerError {
    /// The first listing page of a category could not be fetched
    #[error("First page of category {category} ({url}) failed: {source}")]
    FirstPage {
        category: String,
        url: String,
        #[source]
        source: FetchError,
    },

    /// The edition homepage used for topic discovery could not be fetched
    #[error("Homepage {url} failed: {source}")]
    Homepage {
        url: String,
        #[source]
        source: FetchError,
    },

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Edition code not present in the configuration
    #[error("Unknown edition: {code}. Valid: {valid}")]
    UnknownEdition { code: String, valid: String },

    /// Category name not configured for the edition
    #[error("Unknown category {name} for edition {edition}. Valid: {valid}")]
    UnknownCategory {
        name: String,
        edition: String,
        valid: String,
    },
}

/// Errors raised while writing or merging corpus files
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TSV encoding or decoding error
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Output path without a file name
    #[error("Output path has no file name: {0}")]
    InvalidPath(String),
}

impl StorageError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
