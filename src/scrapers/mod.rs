//! Site scrapers.
//!
//! Each scraper follows the same two-phase pattern:
//!
//! 1. **Indexing**: fetch a listing page and collect article links
//! 2. **Fetching**: fetch every linked article and pull out its text
//!
//! Scrapers are generic over [`crate::fetcher::Fetch`], so the retrying
//! network fetcher is written once and every site only supplies its own
//! extraction rules.
//!
//! # Supported Sources
//!
//! | Source | Module | Notes |
//! |--------|--------|-------|
//! | Thairath | [`thairath`] | Highlight carousel of each news category |

pub mod thairath;

/// A site-specific scrape run.
pub trait Scrape {
    /// What one complete run produces.
    type Output;

    async fn scrape(&self) -> Self::Output;
}
