//! HTML lookup and text helpers shared by site scrapers.
//!
//! Lookups return `Option` instead of failing: a page missing the element we
//! expect is a normal outcome that the caller logs and skips.

use scraper::{ElementRef, Html, Selector};

/// Compile a selector known at build time.
///
/// Only used on string literals, so a parse failure is a programming error.
pub fn static_selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector `{css}`: {e}"))
}

/// The first element in `document` matching `selector`.
pub fn find_container<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

/// Text of `element` with every text node trimmed and joined without separator.
///
/// Returns `default` when the element is absent.
pub fn extract_text(element: Option<ElementRef<'_>>, default: &str) -> String {
    match element {
        Some(el) => el
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect(),
        None => default.to_string(),
    }
}

/// Concatenate [`extract_text`] of every `selector` match under `container`.
pub fn concat_text(container: ElementRef<'_>, selector: &Selector) -> String {
    container
        .select(selector)
        .map(|el| extract_text(Some(el), ""))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(doc: &'a Html, css: &'static str) -> Option<ElementRef<'a>> {
        find_container(doc, &static_selector(css))
    }

    #[test]
    fn test_extract_text_absent_returns_default() {
        assert_eq!(extract_text(None, ""), "");
        assert_eq!(extract_text(None, "n/a"), "n/a");
    }

    #[test]
    fn test_extract_text_strips_whitespace() {
        let doc = Html::parse_fragment("<p>  Hello World  </p>");
        assert_eq!(extract_text(first(&doc, "p"), ""), "Hello World");
    }

    #[test]
    fn test_extract_text_joins_nested_nodes() {
        let doc = Html::parse_fragment("<p> Bangkok <b> floods </b>\n</p>");
        assert_eq!(extract_text(first(&doc, "p"), ""), "Bangkokfloods");
    }

    #[test]
    fn test_find_container_missing() {
        let doc = Html::parse_document("<html><body><div class=\"other\"></div></body></html>");
        assert!(first(&doc, "div.article-body").is_none());
    }

    #[test]
    fn test_concat_text_preserves_order_without_separator() {
        let doc = Html::parse_document(
            r#"<div class="article-body"><p>Part1</p><span>skip</span><p> Part2 </p></div>"#,
        );
        let body = first(&doc, "div.article-body").unwrap();
        assert_eq!(concat_text(body, &static_selector("p")), "Part1Part2");
    }
}
