//! Command-line interface definitions for Thairath News.
//!
//! Every flag maps onto a constructor parameter of the fetcher or the
//! scraper; there is no config file.

use crate::fetcher::FetchPolicy;
use crate::models::Category;
use crate::scrapers::thairath::{BASE_URL, LinkStrategy, ScraperOptions};
use clap::Parser;
use std::time::Duration;

/// Command-line arguments for the Thairath News scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape every category with the default politeness settings
/// thairath_news
///
/// # Only politics and money, faster retries, pretty output
/// thairath_news -c politic -c money --max-retries 5 --delay-min 0.5 --pretty
///
/// # Custom headers replace the defaults entirely
/// thairath_news -H "User-Agent: my-bot/1.0" -H "Accept-Language: th"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL each category name is appended to
    #[arg(long, default_value = BASE_URL)]
    pub base_url: String,

    /// Category to scrape (repeatable); defaults to all of them
    #[arg(short, long = "category", value_name = "NAME")]
    pub categories: Vec<Category>,

    /// Attempts per page before giving up
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_retries: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10.0)]
    pub timeout_secs: f64,

    /// Lower bound of the random delay before each request, in seconds
    #[arg(long, default_value_t = 1.0)]
    pub delay_min: f64,

    /// Upper bound of the random delay before each request, in seconds
    #[arg(long, default_value_t = 3.0)]
    pub delay_max: f64,

    /// Request header as "Name: value" (repeatable); replaces the default headers
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Resolve article links as relative URLs instead of appending them to the listing URL
    #[arg(long)]
    pub resolve_links: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    pub fn fetch_policy(&self) -> Result<FetchPolicy, String> {
        Ok(FetchPolicy {
            max_retries: self.max_retries as usize,
            timeout: secs("timeout-secs", self.timeout_secs)?,
            delay_range: self.delay_range()?,
            ..FetchPolicy::default()
        })
    }

    pub fn scraper_options(&self) -> Result<ScraperOptions, String> {
        let mut categories = if self.categories.is_empty() {
            Category::ALL.to_vec()
        } else {
            self.categories.clone()
        };
        categories.sort();
        categories.dedup();

        Ok(ScraperOptions {
            base_url: self.base_url.clone(),
            categories,
            delay_range: self.delay_range()?,
            link_strategy: if self.resolve_links {
                LinkStrategy::Resolve
            } else {
                LinkStrategy::Concatenate
            },
        })
    }

    /// `None` keeps the fetcher's default headers.
    pub fn header_override(&self) -> Option<Vec<(String, String)>> {
        (!self.headers.is_empty()).then(|| self.headers.clone())
    }

    fn delay_range(&self) -> Result<(Duration, Duration), String> {
        let min = secs("delay-min", self.delay_min)?;
        let max = secs("delay-max", self.delay_max)?;
        if min > max {
            return Err(format!(
                "--delay-min ({}) must not exceed --delay-max ({})",
                self.delay_min, self.delay_max
            ));
        }
        Ok((min, max))
    }
}

fn secs(flag: &str, value: f64) -> Result<Duration, String> {
    Duration::try_from_secs_f64(value).map_err(|e| format!("--{flag} {value}: {e}"))
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in `{raw}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["thairath_news"]);

        let policy = cli.fetch_policy().unwrap();
        assert_eq!(policy, FetchPolicy::default());

        let options = cli.scraper_options().unwrap();
        assert_eq!(options, ScraperOptions::default());
        assert_eq!(cli.header_override(), None);
        assert!(!cli.pretty);
    }

    #[test]
    fn test_cli_categories_keep_canonical_order() {
        let cli = Cli::parse_from(["thairath_news", "-c", "crime", "--category", "Royal", "-c", "crime"]);
        let options = cli.scraper_options().unwrap();
        assert_eq!(options.categories, vec![Category::Royal, Category::Crime]);
    }

    #[test]
    fn test_cli_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["thairath_news", "-c", "sports"]).is_err());
    }

    #[test]
    fn test_cli_rejects_zero_retries() {
        assert!(Cli::try_parse_from(["thairath_news", "--max-retries", "0"]).is_err());
    }

    #[test]
    fn test_cli_timing_flags() {
        let cli = Cli::parse_from([
            "thairath_news",
            "--max-retries",
            "5",
            "--timeout-secs",
            "2.5",
            "--delay-min",
            "0",
            "--delay-max",
            "0.5",
            "--resolve-links",
        ]);

        let policy = cli.fetch_policy().unwrap();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.timeout, Duration::from_millis(2500));
        assert_eq!(policy.delay_range, (Duration::ZERO, Duration::from_millis(500)));
        assert_eq!(
            cli.scraper_options().unwrap().link_strategy,
            LinkStrategy::Resolve
        );
    }

    #[test]
    fn test_cli_inverted_delay_range() {
        let cli = Cli::parse_from(["thairath_news", "--delay-min", "4", "--delay-max", "1"]);
        assert!(cli.fetch_policy().is_err());
        assert!(cli.scraper_options().is_err());
    }

    #[test]
    fn test_cli_negative_timeout() {
        let cli = Cli::parse_from(["thairath_news", "--timeout-secs=-1"]);
        assert!(cli.fetch_policy().is_err());
    }

    #[test]
    fn test_cli_headers() {
        let cli = Cli::parse_from([
            "thairath_news",
            "-H",
            "User-Agent: bot/1.0",
            "--header",
            "Accept-Language:th-TH",
        ]);
        assert_eq!(
            cli.header_override(),
            Some(vec![
                ("User-Agent".to_string(), "bot/1.0".to_string()),
                ("Accept-Language".to_string(), "th-TH".to_string()),
            ])
        );
    }

    #[test]
    fn test_parse_header_errors() {
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
        assert_eq!(
            parse_header("X-Test:  a:b "),
            Ok(("X-Test".to_string(), "a:b".to_string()))
        );
    }
}
