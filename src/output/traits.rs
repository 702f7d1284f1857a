//! Report sink trait and errors
//!
//! A sink receives the finished crawl report and renders it somewhere.

use crate::crawler::CrawlReport;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Column names shared by every tabular sink
pub const REPORT_HEADER: [&str; 3] = ["page_url", "image_url", "matched_term"];

/// Trait for report sinks
pub trait ReportSink {
    /// Renders `report`
    ///
    /// # Arguments
    ///
    /// * `report` - The finished crawl report
    fn write_report(&mut self, report: &CrawlReport) -> OutputResult<()>;
}
