//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: How the visit of one page ended (matched, no matches, failed, etc.)
//! - `SampleProgress`: Tried and matched page sets of a sampling run

mod page_state;
mod sample_state;

// Re-export main types
pub use page_state::PageOutcome;
pub use sample_state::SampleProgress;
