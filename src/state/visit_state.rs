/// Visit state definitions for tracking crawl progress
///
/// This module defines the marker recorded against every URL the crawler
/// has claimed. A URL with no marker has not been seen yet.
use std::fmt;

/// Represents the current state of a URL in the crawl
///
/// The lifecycle is `Absent -> InProgress -> {Success, Failure}`. Absent is
/// implicit (no entry in the visit map).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VisitState {
    /// A task has claimed the URL and its fetch has not completed yet
    InProgress,

    /// The URL was fetched and its links extracted
    Success,

    /// The fetch failed; carries the human-readable reason
    Failure(String),
}

impl VisitState {
    /// Returns true once the fetch for this URL has completed, successfully or not
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns the failure reason, if any
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failure(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    /// Short label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Success => "fetched",
            Self::Failure(_) => "failed",
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failure(reason) => write!(f, "failed: {}", reason),
            other => write!(f, "{}", other.label()),
        }
    }
}
