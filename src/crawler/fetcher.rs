//! Fetch capability
//!
//! The coordinator only knows the [`Fetcher`] trait: given a URL, return the
//! links found on that page or a [`FetchError`]. [`HttpFetcher`] is the
//! production implementation:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - One GET request per URL
//! - Error classification into a single human-readable reason
//! - Link extraction for HTML responses

use crate::config::{HttpConfig, UserAgentConfig};
use crate::crawler::parser::extract_links;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A failed fetch: the URL and an opaque reason
///
/// Network, HTTP status and parse problems all fold into this one kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fetch failed for {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for the common "not found" case
    pub fn not_found(url: impl Into<String>) -> Self {
        let url = url.into();
        let reason = format!("not found: {}", url);
        Self { url, reason }
    }
}

/// Outcome of one fetch: the discovered URLs in page order, duplicates included
pub type FetchResult = Result<Vec<String>, FetchError>;

/// Retrieves a page and returns the URLs it links to
///
/// Implementations must be shareable across tasks; the coordinator calls
/// `fetch` concurrently from many tasks at once.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use ripple_crawl::crawler::{FetchError, FetchResult, Fetcher};
///
/// struct NoLinks;
///
/// #[async_trait]
/// impl Fetcher for NoLinks {
///     async fn fetch(&self, url: &str) -> FetchResult {
///         if url.is_empty() {
///             return Err(FetchError::not_found(url));
///         }
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, url: &str) -> FetchResult {
        (**self).fetch(url).await
    }
}

/// Formats the user agent string: `Name/Version` or `Name/Version (+ContactURL)`
pub fn format_user_agent(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact_url) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact_url
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Builds an HTTP client configured for crawling
///
/// # Arguments
///
/// * `user_agent` - User agent configuration
/// * `http` - Timeout configuration
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::{HttpConfig, UserAgentConfig};
/// use ripple_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(format_user_agent(user_agent))
        .timeout(Duration::from_secs(http.request_timeout_secs))
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP and extracts their links
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an already-built client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from configuration and wraps it
    pub fn from_config(
        user_agent: &UserAgentConfig,
        http: &HttpConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, http)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL and extracts its links
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Unparsable URL | Err, "invalid URL: ..." |
    /// | Timeout | Err, "timeout" |
    /// | Connection failure | Err, "connection failed" |
    /// | HTTP 404 | Err, "not found (HTTP 404)" |
    /// | Other non-2xx | Err, "HTTP <code>" |
    /// | Non-HTML 2xx | Ok, no links |
    /// | HTML 2xx | Ok, links in document order |
    async fn fetch(&self, url: &str) -> FetchResult {
        let parsed = Url::parse(url)
            .map_err(|e| FetchError::new(url, format!("invalid URL: {}", e)))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::new(url, classify_transport_error(&e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::new(url, "not found (HTTP 404)"));
        }
        if !status.is_success() {
            return Err(FetchError::new(url, format!("HTTP {}", status.as_u16())));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Links resolve against where the body actually came from
        let final_url = response.url().clone();

        if !is_html(&content_type) {
            tracing::debug!("Skipping link extraction for {} ({})", url, content_type);
            return Ok(Vec::new());
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::new(url, format!("failed to read body: {}", e)))?;

        Ok(extract_links(&body, &final_url))
    }
}

/// Missing content types are treated as HTML
fn is_html(content_type: &str) -> bool {
    content_type.is_empty()
        || content_type.contains("text/html")
        || content_type.contains("application/xhtml+xml")
}

fn classify_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "timeout".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    }
}
