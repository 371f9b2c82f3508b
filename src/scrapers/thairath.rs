//! Thairath highlight-news scraper.
//!
//! Each category page on [Thairath](https://www.thairath.co.th/news/) has a
//! carousel (`div.slick-track`) of highlighted stories. For every link in the
//! carousel the article page is fetched and the paragraphs inside
//! `div.article-body` are concatenated into the article content.
//!
//! # URL Pattern
//!
//! Listing pages are `https://www.thairath.co.th/news/<category>`. Carousel
//! links are relative and, by default, appended verbatim to the listing URL
//! (see [`LinkStrategy`]).

use crate::extract::{concat_text, find_container, static_selector};
use crate::fetcher::{Fetch, random_delay};
use crate::models::{ArticleRecord, Category, CategoryArticles, ScrapeReport};
use crate::scrapers::Scrape;
use crate::utils::truncate_for_log;
use chrono::Local;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const BASE_URL: &str = "https://www.thairath.co.th/news/";

static CAROUSEL: Lazy<Selector> = Lazy::new(|| static_selector("div.slick-track"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| static_selector("a"));
static ARTICLE_BODY: Lazy<Selector> = Lazy::new(|| static_selector("div.article-body"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| static_selector("p"));

/// How a carousel `href` becomes an article URL.
///
/// An `href` that is already an absolute URL is used unchanged by both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStrategy {
    /// `listing_url + href`, exactly as the site's links have always been built.
    #[default]
    Concatenate,
    /// Standard relative reference resolution against the listing URL.
    Resolve,
}

impl LinkStrategy {
    /// Build the article URL, or `None` if resolution is impossible.
    pub fn article_url(&self, listing_url: &str, href: &str) -> Option<String> {
        if Url::parse(href).is_ok() {
            return Some(href.to_string());
        }
        match self {
            LinkStrategy::Concatenate => Some(format!("{listing_url}{href}")),
            LinkStrategy::Resolve => Url::parse(listing_url)
                .and_then(|base| base.join(href))
                .map(String::from)
                .ok(),
        }
    }
}

/// Constructor parameters for [`ThairathScraper`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScraperOptions {
    /// Prefix every category identifier is appended to.
    pub base_url: String,
    /// Categories to scrape, in order.
    pub categories: Vec<Category>,
    /// Random pause between two categories.
    pub delay_range: (Duration, Duration),
    pub link_strategy: LinkStrategy,
}

impl Default for ScraperOptions {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            categories: Category::ALL.to_vec(),
            delay_range: (Duration::from_secs(1), Duration::from_secs(3)),
            link_strategy: LinkStrategy::default(),
        }
    }
}

/// A carousel entry before its article page has been fetched.
#[derive(Debug)]
struct HighlightLink {
    title: Option<String>,
    link: String,
}

#[derive(Debug)]
pub struct ThairathScraper<F> {
    fetcher: F,
    options: ScraperOptions,
}

impl<F> ThairathScraper<F>
where
    F: Fetch,
{
    pub fn new(fetcher: F, options: ScraperOptions) -> Self {
        Self { fetcher, options }
    }

    /// Scrape the highlight carousel of one category listing page.
    ///
    /// Returns `None` when the listing page cannot be fetched or has no
    /// carousel. Articles whose page fails still produce a record, with
    /// `content` set to `None`.
    #[instrument(level = "info", skip_all, fields(%category_url, %category))]
    pub async fn list_articles(
        &self,
        category_url: &str,
        category: Category,
    ) -> Option<Vec<ArticleRecord>> {
        let document = self.fetcher.fetch(category_url).await?;
        let highlights = self.highlight_links(&document, category_url)?;
        drop(document);

        let mut records = Vec::with_capacity(highlights.len());
        for HighlightLink { title, link } in highlights {
            let content = self.fetch_article_content(&link).await;
            records.push(ArticleRecord {
                title,
                link,
                category,
                content,
            });
        }

        info!(count = records.len(), "Scraped highlight articles");
        Some(records)
    }

    /// Fetch an article page and join its body paragraphs.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch_article_content(&self, url: &str) -> Option<String> {
        let document = self.fetcher.fetch(url).await?;

        let Some(body) = find_container(&document, &ARTICLE_BODY) else {
            warn!(%url, "Article body not found; skipping content");
            return None;
        };

        let content = concat_text(body, &PARAGRAPH);
        debug!(
            bytes = content.len(),
            preview = %truncate_for_log(&content, 60),
            "Parsed article body"
        );
        Some(content)
    }

    fn highlight_links(&self, document: &Html, category_url: &str) -> Option<Vec<HighlightLink>> {
        let Some(carousel) = find_container(document, &CAROUSEL) else {
            warn!(%category_url, "Highlight carousel not found; skipping category");
            return None;
        };

        let mut links = Vec::new();
        for anchor in carousel.select(&ANCHOR) {
            let Some(href) = anchor.value().attr("href") else {
                debug!("Carousel anchor without href");
                continue;
            };
            let Some(link) = self.options.link_strategy.article_url(category_url, href) else {
                warn!(%href, "Could not build article URL");
                continue;
            };
            links.push(HighlightLink {
                title: anchor.value().attr("title").map(str::to_string),
                link,
            });
        }
        Some(links)
    }
}

impl<F> Scrape for ThairathScraper<F>
where
    F: Fetch,
{
    type Output = ScrapeReport;

    /// Scrape every configured category, pausing between categories.
    #[instrument(level = "info", skip_all)]
    async fn scrape(&self) -> ScrapeReport {
        let scraped_at = Local::now().to_rfc3339();
        let mut categories = Vec::with_capacity(self.options.categories.len());

        for (i, category) in self.options.categories.iter().copied().enumerate() {
            if i > 0 {
                sleep(random_delay(self.options.delay_range)).await;
            }

            let url = category.listing_url(&self.options.base_url);
            let articles = self.list_articles(&url, category).await;
            if articles.is_none() {
                warn!(%category, %url, "No articles scraped for category");
            }
            categories.push(CategoryArticles { category, articles });
        }

        let report = ScrapeReport {
            scraped_at,
            categories,
        };
        info!(
            categories = report.categories.len(),
            articles = report.article_count(),
            failed = ?report.failed_categories(),
            "Scrape finished"
        );
        report
    }
}
