//! CSV report file
//!
//! Writes one row per matching image under a `page_url,image_url,matched_term`
//! header. Quoting and escaping follow RFC 4180 via the `csv` crate.

use crate::crawler::CrawlReport;
use crate::matcher::MatchResult;
use crate::output::traits::{OutputResult, ReportSink, REPORT_HEADER};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the header and one row per match to `writer`
pub fn write_matches_csv<W: Write>(writer: W, matches: &[MatchResult]) -> OutputResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(REPORT_HEADER)?;

    for m in matches {
        csv.write_record([&m.page_url, &m.image_url, &m.matched_term])?;
    }

    csv.flush()?;
    Ok(())
}

/// Saves matches to a CSV file
///
/// When the report has no matches nothing is written and an existing file
/// at the path is left untouched.
#[derive(Debug, Clone)]
pub struct CsvReport {
    path: PathBuf,
}

impl CsvReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for CsvReport {
    fn write_report(&mut self, report: &CrawlReport) -> OutputResult<()> {
        if report.matches.is_empty() {
            println!("No matching images found to save");
            return Ok(());
        }

        let file = File::create(&self.path)?;
        write_matches_csv(file, &report.matches)?;
        println!("Results saved to {}", self.path.display());

        Ok(())
    }
}
