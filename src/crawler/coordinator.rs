//! Crawler coordinator - recursive crawl orchestration
//!
//! Each call to [`Coordinator::crawl`] handles one URL:
//! - Prune when the remaining depth is exhausted
//! - Claim the URL in the shared visit map (at most one task ever wins)
//! - Fetch it without holding the visit map lock
//! - Record the outcome
//! - Spawn one task per discovered link and wait for all of them
//!
//! The visit map is the only shared mutable state. Fetch failures are
//! recorded against their URL and never propagate out of `crawl`.

use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::state::{VisitMap, VisitState};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

type CrawlFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Main crawler coordinator structure
///
/// Cloning is cheap: clones share the fetcher, the visit map and the
/// concurrency limit.
pub struct Coordinator<F> {
    fetcher: Arc<F>,
    visits: Arc<VisitMap>,
    fetch_limit: Option<Arc<Semaphore>>,
}

impl<F> Clone for Coordinator<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            visits: Arc::clone(&self.visits),
            fetch_limit: self.fetch_limit.clone(),
        }
    }
}

impl<F: Fetcher + 'static> Coordinator<F> {
    /// Creates a coordinator with a fresh, empty visit map and no concurrency limit
    pub fn new(fetcher: F) -> Self {
        Self::with_visit_map(fetcher, Arc::new(VisitMap::new()))
    }

    /// Creates a coordinator that records visits into an existing map
    ///
    /// URLs already present in `visits` are treated as visited and are
    /// never fetched.
    pub fn with_visit_map(fetcher: F, visits: Arc<VisitMap>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            visits,
            fetch_limit: None,
        }
    }

    /// Caps the number of fetches in flight at once; `0` removes the cap
    ///
    /// The permit is held only for the duration of the fetch call, never
    /// while a task waits on its children.
    pub fn with_concurrency_limit(mut self, max_concurrent_fetches: usize) -> Self {
        self.fetch_limit = match max_concurrent_fetches {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };
        self
    }

    /// Shared handle to the visit map, for reporting once the crawl is done
    pub fn visits(&self) -> &Arc<VisitMap> {
        &self.visits
    }

    /// Crawls `url` and everything reachable from it within `depth`
    ///
    /// Returns only after the whole subtree has been explored or pruned.
    /// A `depth` of 0 fetches nothing; a `depth` of 1 fetches `url` alone.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ripple_crawl::config::{HttpConfig, UserAgentConfig};
    /// use ripple_crawl::crawler::{Coordinator, HttpFetcher};
    ///
    /// # async fn example() -> Result<(), reqwest::Error> {
    /// let fetcher = HttpFetcher::from_config(&UserAgentConfig::default(), &HttpConfig::default())?;
    /// let coordinator = Coordinator::new(fetcher);
    /// coordinator.crawl("https://example.com/", 3).await;
    /// println!("{} URLs visited", coordinator.visits().len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl(&self, url: &str, depth: u32) {
        self.crawl_task(url.to_string(), depth).await
    }

    // Boxed so the recursion through tokio::spawn has a nameable, 'static type
    fn crawl_task(&self, url: String, depth: u32) -> CrawlFuture {
        let this = self.clone();
        Box::pin(async move { this.visit(url, depth).await })
    }

    async fn visit(&self, url: String, depth: u32) {
        if depth == 0 {
            tracing::trace!("Done with {}, depth exhausted", url);
            return;
        }

        if !self.visits.claim(&url) {
            tracing::trace!("Done with {}, already claimed", url);
            return;
        }

        let links = match self.fetch(&url).await {
            Ok(links) => {
                self.visits.resolve(&url, VisitState::Success);
                links
            }
            Err(e) => {
                tracing::debug!("Error on {}: {}", url, e.reason);
                self.visits.resolve(&url, VisitState::Failure(e.reason));
                return;
            }
        };

        let total = links.len();
        tracing::debug!("Fetched {} ({} links, depth {})", url, total, depth);

        let mut children = JoinSet::new();
        for (i, link) in links.into_iter().enumerate() {
            tracing::debug!("Crawling child {}/{} of {}: {}", i + 1, total, url, link);
            children.spawn(self.crawl_task(link, depth - 1));
        }

        let mut finished = 0;
        while let Some(result) = children.join_next().await {
            finished += 1;
            if let Err(e) = result {
                tracing::warn!("Child task of {} did not complete cleanly: {}", url, e);
            }
            tracing::trace!("[{}] {}/{} children finished", url, finished, total);
        }

        tracing::debug!("Done with {}", url);
    }

    async fn fetch(&self, url: &str) -> FetchResult {
        // Closed only if the semaphore is dropped, which cannot happen while
        // self holds it; fall through without a permit in that case.
        let _permit = match &self.fetch_limit {
            Some(limit) => Arc::clone(limit).acquire_owned().await.ok(),
            None => None,
        };
        self.fetcher.fetch(url).await
    }
}
