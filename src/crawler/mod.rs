//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The `Fetcher` capability and its HTTP implementation
//! - HTML link extraction
//! - The recursive, deduplicating crawl coordinator

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::Coordinator;
pub use fetcher::{
    build_http_client, format_user_agent, FetchError, FetchResult, Fetcher, HttpFetcher,
};
pub use parser::extract_links;

use crate::config::{validate, Config};
use crate::output::CrawlSummary;
use crate::state::VisitMap;
use crate::CrawlError;
use chrono::Utc;
use std::sync::Arc;
use url::Url;

/// Crawls `url` to `depth` with the given fetcher and returns the visit map
///
/// Shorthand for building a [`Coordinator`] with no concurrency limit.
pub async fn crawl<F: Fetcher + 'static>(url: &str, depth: u32, fetcher: F) -> Arc<VisitMap> {
    let coordinator = Coordinator::new(fetcher);
    coordinator.crawl(url, depth).await;
    Arc::clone(coordinator.visits())
}

/// Runs a complete crawl operation over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and the start URL
/// 2. Build the HTTP client
/// 3. Crawl to the configured depth
/// 4. Read the visit map once and summarize it
///
/// Individual fetch failures do not make this function fail; they show up
/// in the returned summary.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `start_url` - The seed URL
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed
/// * `Err(CrawlError)` - The configuration, start URL or HTTP client setup was invalid
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::Config;
/// use ripple_crawl::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_crawl(&Config::default(), "https://example.com/").await?;
/// println!("{} fetched, {} failed", summary.fetched, summary.failed);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, start_url: &str) -> Result<CrawlSummary, CrawlError> {
    validate(config)?;
    Url::parse(start_url).map_err(|source| CrawlError::InvalidStartUrl {
        url: start_url.to_string(),
        source,
    })?;

    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.http)?;
    let coordinator = Coordinator::new(fetcher)
        .with_concurrency_limit(config.crawler.max_concurrent_fetches);

    tracing::info!(
        "Starting crawl of {} (max depth {}, {})",
        start_url,
        config.crawler.max_depth,
        match config.crawler.max_concurrent_fetches {
            0 => "unbounded concurrency".to_string(),
            n => format!("at most {} concurrent fetches", n),
        }
    );

    let started_at = Utc::now();
    coordinator.crawl(start_url, config.crawler.max_depth).await;
    let finished_at = Utc::now();

    let summary = CrawlSummary::from_visits(
        start_url,
        config.crawler.max_depth,
        coordinator.visits().snapshot(),
        started_at,
        finished_at,
    );

    tracing::info!(
        "Crawl completed: {} fetched, {} failed in {}ms",
        summary.fetched,
        summary.failed,
        summary.duration_millis()
    );

    Ok(summary)
}
