//! Shared visit map
//!
//! The only mutable state shared between crawl tasks. All access goes
//! through a single mutex with no read/write distinction; the lock is held
//! for map operations only and never across an `.await`.

use crate::state::VisitState;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mapping from URL to its visit state, guarded by one mutex
#[derive(Debug, Default)]
pub struct VisitMap {
    visits: Mutex<HashMap<String, VisitState>>,
}

impl VisitMap {
    /// Creates an empty visit map
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking task cannot leave the map half-written: every critical
    // section is a single insert or lookup.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, VisitState>> {
        self.visits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims a URL for fetching
    ///
    /// Checks for the URL and marks it `InProgress` in one critical section.
    /// Returns `true` only for the first caller; every later caller (while
    /// the fetch is running or after it resolved) gets `false`.
    pub fn claim(&self, url: &str) -> bool {
        let mut visits = self.lock();
        if visits.contains_key(url) {
            return false;
        }
        visits.insert(url.to_string(), VisitState::InProgress);
        true
    }

    /// Records the final outcome of a claimed URL
    pub fn resolve(&self, url: &str, outcome: VisitState) {
        let mut visits = self.lock();
        if let Some(previous) = visits.insert(url.to_string(), outcome) {
            if previous.is_resolved() {
                tracing::warn!("Visit state for {} resolved twice", url);
            }
        } else {
            tracing::warn!("Resolved {} without claiming it first", url);
        }
    }

    /// Returns the current state of a URL, or `None` if it was never claimed
    pub fn get(&self, url: &str) -> Option<VisitState> {
        self.lock().get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains_key(url)
    }

    /// Number of URLs claimed so far
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies every entry out of the map
    ///
    /// Intended to be called once after the root crawl has returned, to
    /// build the summary report. Order is unspecified.
    pub fn snapshot(&self) -> Vec<(String, VisitState)> {
        self.lock()
            .iter()
            .map(|(url, state)| (url.clone(), state.clone()))
            .collect()
    }
}
