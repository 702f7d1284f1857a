//! Output module for rendering crawl reports
//!
//! This module handles:
//! - Saving matches to a CSV file (exhaustive runs)
//! - Printing matches and a summary line to the console (sampling runs)

mod console;
mod csv_report;
mod traits;

pub use console::ConsoleReport;
pub use csv_report::{write_matches_csv, CsvReport};
pub use traits::{OutputError, OutputResult, ReportSink, REPORT_HEADER};
