//! Crawl summary built from the visit map
//!
//! The visit map is read exactly once, after the root crawl has returned.
//! Entries are sorted by URL so the report is deterministic.

use crate::state::VisitState;
use chrono::{DateTime, Utc};

/// Final outcome of one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOutcome {
    pub url: String,
    pub state: VisitState,
}

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// The seed URL
    pub start_url: String,

    /// Depth the crawl was started with
    pub max_depth: u32,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Every claimed URL, sorted by URL
    pub outcomes: Vec<UrlOutcome>,

    /// Number of URLs fetched successfully
    pub fetched: usize,

    /// Number of URLs whose fetch failed
    pub failed: usize,

    /// URLs still marked in progress; always 0 for a crawl that ran to completion
    pub in_progress: usize,
}

impl CrawlSummary {
    /// Builds a summary from a visit map snapshot
    pub fn from_visits(
        start_url: &str,
        max_depth: u32,
        visits: Vec<(String, VisitState)>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let mut outcomes: Vec<UrlOutcome> = visits
            .into_iter()
            .map(|(url, state)| UrlOutcome { url, state })
            .collect();
        outcomes.sort_by(|a, b| a.url.cmp(&b.url));

        let fetched = outcomes.iter().filter(|o| o.state.is_success()).count();
        let failed = outcomes.iter().filter(|o| o.state.is_failure()).count();
        let in_progress = outcomes.len() - fetched - failed;

        Self {
            start_url: start_url.to_string(),
            max_depth,
            started_at,
            finished_at,
            outcomes,
            fetched,
            failed,
            in_progress,
        }
    }

    /// Total number of URLs claimed during the crawl
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn duration_millis(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Percentage of claimed URLs that were fetched successfully
    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            (self.fetched as f64 / self.outcomes.len() as f64) * 100.0
        }
    }

    /// Outcome for one URL, if it was claimed
    pub fn outcome(&self, url: &str) -> Option<&VisitState> {
        self.outcomes
            .binary_search_by(|o| o.url.as_str().cmp(url))
            .ok()
            .map(|i| &self.outcomes[i].state)
    }

    /// Iterates over failed URLs and their reasons
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.state.failure_reason().map(|r| (o.url.as_str(), r)))
    }
}

/// Formats one report line per URL
pub fn format_outcome_line(outcome: &UrlOutcome) -> String {
    match &outcome.state {
        VisitState::Success => format!("{} was fetched", outcome.url),
        VisitState::Failure(reason) => format!("{} failed: {}", outcome.url, reason),
        VisitState::InProgress => format!("{} never finished", outcome.url),
    }
}

/// Prints the summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("Fetching stats");
    println!("--------------");
    for outcome in &summary.outcomes {
        println!("{}", format_outcome_line(outcome));
    }
    println!();

    println!(
        "{} URLs: {} fetched, {} failed ({:.1}% success) in {}ms",
        summary.total(),
        summary.fetched,
        summary.failed,
        summary.success_rate(),
        summary.duration_millis()
    );
    if summary.in_progress > 0 {
        println!("{} URLs never finished", summary.in_progress);
    }
}
