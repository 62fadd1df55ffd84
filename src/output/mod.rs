//! Output module for crawl summaries and reports
//!
//! This module handles:
//! - Building a deterministic summary from the visit map
//! - Printing the "fetching stats" report to stdout
//! - Writing an optional markdown summary file

mod markdown;
mod summary;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use summary::{format_outcome_line, print_summary, CrawlSummary, UrlOutcome};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
