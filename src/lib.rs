//! Ripple-Crawl: a recursive, deduplicating web crawler
//!
//! Starting from a seed URL, the crawler fetches each page, extracts its
//! outbound links and crawls them concurrently down to a depth bound. A
//! shared visit map guarantees that no URL is fetched more than once per run.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Ripple-Crawl operations
///
/// Fetch failures never show up here: they are recorded against their URL
/// in the visit map and do not abort the crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid start URL '{url}': {source}")]
    InvalidStartUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Ripple-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, FetchError, Fetcher, HttpFetcher};
pub use state::{VisitMap, VisitState};
