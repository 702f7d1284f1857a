//! Pixel-Sift main entry point
//!
//! This is the command-line interface for the Pixel-Sift image finder.

use anyhow::Context;
use clap::Parser;
use pixel_sift::config::{effective_workers, load_config_or_default};
use pixel_sift::crawler::build_http_client;
use pixel_sift::output::{ConsoleReport, CsvReport, ReportSink};
use pixel_sift::{
    build_crawler, scan_sitemap, CrawlMode, CrawlReport, ImageCache, PageCache, SearchTerms,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pixel-Sift: find images on a website that mention your terms
///
/// Pixel-Sift walks every page listed in a sitemap and checks each embedded
/// image for the search terms in its recognized text, its URL and its alt
/// text. Pages and images are cached on disk between runs.
#[derive(Parser, Debug)]
#[command(name = "pixel-sift")]
#[command(version = "1.0.0")]
#[command(about = "Scan documentation for images matching search terms", long_about = None)]
struct Cli {
    /// URL of the sitemap to scan
    #[arg(long)]
    sitemap: String,

    /// Terms to search for in images
    #[arg(long = "search-terms", num_args = 1.., required = true)]
    search_terms: Vec<String>,

    /// Clear both caches before running
    #[arg(long)]
    clear_cache: bool,

    /// Output CSV file path (ignored with --test)
    #[arg(long, default_value = "matching_images.csv")]
    output: PathBuf,

    /// Number of concurrent image processors [default: 3]
    #[arg(long)]
    workers: Option<usize>,

    /// Sample random pages and print matches instead of writing a file
    #[arg(long)]
    test: bool,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let mut config = match load_config_or_default(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(workers) = cli.workers {
        config.crawler.workers = effective_workers(workers);
    }

    let terms = SearchTerms::new(cli.search_terms.iter().cloned());
    if terms.is_empty() {
        return Err("at least one non-blank search term is required".into());
    }

    let page_cache = PageCache::from_config(&config.cache);
    let image_cache = ImageCache::from_config(&config.cache);

    if cli.clear_cache {
        handle_clear_cache(&page_cache, &image_cache).await;
    }

    let client = build_http_client(&config.http)?;
    let crawler = build_crawler(&config, client.clone(), page_cache, image_cache)
        .await?
        .with_progress(!cli.quiet && !cli.test);

    let mode = if cli.test {
        CrawlMode::sampling(&config.crawler)
    } else {
        CrawlMode::Exhaustive
    };

    // A sitemap failure is reported and yields an empty report
    let report = match scan_sitemap(&crawler, &client, &cli.sitemap, &terms, &mode).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("{}", e);
            CrawlReport::default()
        }
    };

    if cli.test {
        ConsoleReport::stdout()
            .write_report(&report)
            .context("Failed to print report")?;
    } else {
        println!("Found {} matching images", report.matches.len());

        let mut sink = CsvReport::new(&cli.output);
        sink.write_report(&report)
            .with_context(|| format!("Failed to save results to {}", cli.output.display()))?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pixel_sift=info,warn"),
            1 => EnvFilter::new("pixel_sift=debug,info"),
            2 => EnvFilter::new("pixel_sift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --clear-cache: empties both caches and reports what was removed
async fn handle_clear_cache(page_cache: &PageCache, image_cache: &ImageCache) {
    match image_cache.clear().await {
        Ok(removed) => println!("Image cache cleared ({} entries)", removed),
        Err(e) => println!("Error clearing image cache: {}", e),
    }

    match page_cache.clear().await {
        Ok(removed) => println!("Page cache cleared ({} entries)", removed),
        Err(e) => println!("Error clearing page cache: {}", e),
    }
}
