//! # Thairath News
//!
//! Scrapes the highlighted stories of each Thairath news category and prints
//! them as a JSON report.
//!
//! ## Usage
//!
//! ```sh
//! thairath_news --pretty > highlights.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: [`fetcher::Fetcher`] wraps every GET with a random
//!    politeness delay and exponential backoff
//! 2. **Indexing**: each category listing page yields its carousel links
//! 3. **Extraction**: each linked article page yields its body text
//! 4. **Output**: the [`models::ScrapeReport`] is written to stdout; logs go
//!    to stderr
//!
//! Requests are issued one at a time, category after category.

use clap::Parser;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod extract;
mod fetcher;
mod models;
mod scrapers;
mod utils;

use cli::Cli;
use fetcher::Fetcher;
use scrapers::Scrape;
use scrapers::thairath::ThairathScraper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("thairath_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let policy = args.fetch_policy()?;
    let options = args.scraper_options()?;
    let fetcher = Fetcher::http(args.header_override(), policy)?;
    info!(
        base_url = %options.base_url,
        categories = options.categories.len(),
        max_retries = fetcher.policy().max_retries,
        timeout = ?fetcher.policy().timeout,
        "Configured scraper"
    );

    let scraper = ThairathScraper::new(fetcher, options);
    let report = scraper.scrape().await;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        articles = report.article_count(),
        failed_categories = report.failed_categories().len(),
        "Execution complete"
    );

    Ok(())
}
