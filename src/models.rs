//! Data models for scraped Thairath articles.
//!
//! - [`Category`]: the fixed, ordered set of news sections
//! - [`ArticleRecord`]: one highlighted article found on a category page
//! - [`CategoryArticles`]: everything scraped for a single category
//! - [`ScrapeReport`]: the full result of one run across all categories

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A topical section of the news site.
///
/// Every category maps to its listing page by appending [`Category::as_str`]
/// to the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Royal,
    Society,
    Politic,
    Money,
    Foreign,
    Crime,
}

impl Category {
    /// All categories in the order they are scraped.
    pub const ALL: [Category; 6] = [
        Category::Royal,
        Category::Society,
        Category::Politic,
        Category::Money,
        Category::Foreign,
        Category::Crime,
    ];

    /// The lowercase identifier used in listing URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Royal => "royal",
            Category::Society => "society",
            Category::Politic => "politic",
            Category::Money => "money",
            Category::Foreign => "foreign",
            Category::Crime => "crime",
        }
    }

    /// Build the listing URL for this category.
    ///
    /// Plain string concatenation: `base_url` is expected to end with `/`.
    pub fn listing_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                let known = Category::ALL.map(|c| c.as_str()).join(", ");
                format!("unknown category `{s}` (expected one of: {known})")
            })
    }
}

/// A single article discovered in a category's highlight carousel.
///
/// # Fields
///
/// * `title` - The anchor's `title` attribute, if it had one
/// * `link` - Absolute URL of the article page
/// * `category` - The category whose listing page linked to it
/// * `content` - Concatenated paragraph text, or `None` when the article
///   page could not be fetched or had no body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    pub title: Option<String>,
    pub link: String,
    pub category: Category,
    pub content: Option<String>,
}

/// The outcome of scraping one category.
///
/// `articles` is `None` when the listing page itself was unusable, which is
/// different from a listing page with an empty carousel (`Some(vec![])`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryArticles {
    pub category: Category,
    pub articles: Option<Vec<ArticleRecord>>,
}

/// Everything produced by one scrape run.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    /// Local time the run started, RFC 3339.
    pub scraped_at: String,
    pub categories: Vec<CategoryArticles>,
}

impl ScrapeReport {
    /// Total number of article records across all categories.
    pub fn article_count(&self) -> usize {
        self.categories
            .iter()
            .filter_map(|c| c.articles.as_ref())
            .map(Vec::len)
            .sum()
    }

    /// Categories whose listing page yielded no result at all.
    pub fn failed_categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|c| c.articles.is_none())
            .map(|c| c.category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Category, content: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            title: Some("T".to_string()),
            link: "https://example.com/a".to_string(),
            category,
            content: content.map(str::to_string),
        }
    }

    #[test]
    fn test_category_order_is_fixed() {
        let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        assert_eq!(
            names,
            vec!["royal", "society", "politic", "money", "foreign", "crime"]
        );
    }

    #[test]
    fn test_listing_url_concatenates() {
        assert_eq!(
            Category::Politic.listing_url("https://www.thairath.co.th/news/"),
            "https://www.thairath.co.th/news/politic"
        );
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Money".parse::<Category>(), Ok(Category::Money));
        assert_eq!(" crime ".parse::<Category>(), Ok(Category::Crime));
        let err = "sports".parse::<Category>().unwrap_err();
        assert!(err.contains("sports"));
        assert!(err.contains("royal"));
    }

    #[test]
    fn test_article_record_serialization() {
        let json = serde_json::to_string(&record(Category::Foreign, None)).unwrap();
        assert!(json.contains(r#""category":"foreign""#));
        assert!(json.contains(r#""content":null"#));
    }

    #[test]
    fn test_report_counts() {
        let report = ScrapeReport {
            scraped_at: "2025-05-06T08:00:00+07:00".to_string(),
            categories: vec![
                CategoryArticles {
                    category: Category::Royal,
                    articles: Some(vec![
                        record(Category::Royal, Some("a")),
                        record(Category::Royal, None),
                    ]),
                },
                CategoryArticles {
                    category: Category::Society,
                    articles: None,
                },
                CategoryArticles {
                    category: Category::Money,
                    articles: Some(vec![]),
                },
            ],
        };

        assert_eq!(report.article_count(), 2);
        assert_eq!(report.failed_categories(), vec![Category::Society]);
    }
}
