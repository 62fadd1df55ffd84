//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitState`: The marker recorded against a URL (in progress, fetched, failed)
//! - `VisitMap`: The mutex-guarded URL -> `VisitState` map shared by all crawl tasks

mod visit_map;
mod visit_state;

// Re-export main types
pub use visit_map::VisitMap;
pub use visit_state::VisitState;
