use crate::crawler::CrawlReport;
use crate::output::csv_report::write_matches_csv;
use crate::output::traits::{OutputResult, ReportSink};
use std::io::Write;

const DELIMITER: &str = "--------------------------------------------------------------------------------";

/// Prints a sampling report: the CSV rows between delimiter lines and a summary line
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl ConsoleReport<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for ConsoleReport<W> {
    fn write_report(&mut self, report: &CrawlReport) -> OutputResult<()> {
        writeln!(self.out, "{}", DELIMITER)?;
        write_matches_csv(&mut self.out, &report.matches)?;
        writeln!(self.out, "{}", DELIMITER)?;
        writeln!(
            self.out,
            "{} of {} sampled pages had at least one matching image",
            report.matched_pages, report.pages_visited
        )?;
        self.out.flush()?;

        Ok(())
    }
}
