//! ABC News article scraper.
//!
//! Scrapes [ABC News](https://www.abc.net.au/news/). Article URLs carry their
//! publication date in the path, e.g.
//! `https://www.abc.net.au/news/2025-05-06/rba-holds-rates/105259212`, so
//! same-day stories are found by looking for `/news/<date>` in homepage links.
//!
//! Article pages are reduced to the text of their `<p>` elements.

use crate::config::ScanConfig;
use crate::error::ScoutError;
use crate::fetch::Fetch;
use crate::models::NewsArticle;
use itertools::Itertools;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};

/// Extract same-day article links from a homepage document.
///
/// An `href` qualifies when it contains `/news/<date_token>`. Hrefs already
/// starting with `origin` are kept as-is; anything else gets `origin`
/// prepended verbatim. Duplicates collapse, first occurrence wins the
/// position.
///
/// # Arguments
///
/// * `html` - The homepage document
/// * `origin` - Site origin without a trailing slash, e.g. `https://www.abc.net.au`
/// * `date_token` - Date in `YYYY-MM-DD` form
///
/// # Returns
///
/// Absolute article URLs in document order. A malformed document yields
/// fewer or no links rather than an error.
///
/// # Errors
///
/// Returns [`ScoutError::Parse`] only if the anchor selector fails to parse.
pub fn extract_article_links(
    html: &str,
    origin: &str,
    date_token: &str,
) -> Result<Vec<String>, ScoutError> {
    let document = Html::parse_document(html);
    let anchor_selector =
        Selector::parse("a[href]").map_err(|e| ScoutError::parse("anchor selector", e))?;
    let needle = format!("/news/{date_token}");

    let links = document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| href.contains(&needle))
        .map(|href| {
            if href.starts_with(origin) {
                href.to_string()
            } else {
                format!("{origin}{href}")
            }
        })
        .unique()
        .collect();

    Ok(links)
}

/// Text of every `<p>` element in document order, joined by single spaces.
///
/// Malformed markup just yields fewer paragraphs.
pub fn extract_paragraph_text(html: &str) -> Result<String, ScoutError> {
    let document = Html::parse_document(html);
    let paragraph_selector =
        Selector::parse("p").map_err(|e| ScoutError::parse("paragraph selector", e))?;

    Ok(document
        .select(&paragraph_selector)
        .map(|p| p.text().collect::<String>())
        .join(" "))
}

/// Index the homepage for article URLs published on `date_token`.
///
/// A homepage fetch failure is returned to the caller.
#[instrument(level = "info", skip(fetcher, config), fields(homepage = %config.homepage))]
pub async fn index_articles<F: Fetch>(
    fetcher: &F,
    config: &ScanConfig,
    date_token: &str,
) -> Result<Vec<String>, ScoutError> {
    let html = fetcher.fetch_text(&config.homepage).await?;
    let article_urls = extract_article_links(&html, &config.origin, date_token)?;

    info!(
        count = article_urls.len(),
        date = date_token,
        "Indexed ABC article URLs"
    );
    debug!(urls = ?article_urls, "ABC URLs");

    Ok(article_urls)
}

/// Fetch a single ABC article and extract its paragraph text.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_article<F: Fetch>(fetcher: &F, url: &str) -> Result<NewsArticle, ScoutError> {
    let body = fetcher.fetch_text(url).await?;
    let content = extract_paragraph_text(&body)?;

    info!(bytes = content.len(), "Parsed ABC article");
    Ok(NewsArticle {
        source: url.to_string(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::filter::KeywordSet;
    use std::collections::HashMap;

    const ORIGIN: &str = "https://www.abc.net.au";

    struct StaticPages(HashMap<String, String>);

    impl Fetch for StaticPages {
        async fn fetch_text(&self, url: &str) -> Result<String, ScoutError> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| ScoutError::network(url, "404 in test fixture"))
        }
    }

    fn pages(entries: &[(&str, &str)]) -> StaticPages {
        StaticPages(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_extracts_relative_and_absolute_links() {
        let html = r#"
            <html><body>
              <a href="/news/2024-01-01/rates-hold/1001">Rates</a>
              <a href="https://www.abc.net.au/news/2024-01-01/asx-rally/1002">ASX</a>
              <a href="/news/2023-12-31/old-story/999">Old</a>
              <a href="/sport/2024-01-01/cricket/1003">Sport</a>
              <a>no href</a>
            </body></html>
        "#;

        let links = extract_article_links(html, ORIGIN, "2024-01-01").unwrap();
        assert_eq!(
            links,
            vec![
                "https://www.abc.net.au/news/2024-01-01/rates-hold/1001",
                "https://www.abc.net.au/news/2024-01-01/asx-rally/1002",
            ]
        );
    }

    #[test]
    fn test_duplicate_links_collapse() {
        let html = r#"
            <a href="/news/2024-01-01/story">one</a>
            <a href="/news/2024-01-01/story">two</a>
            <a href="https://www.abc.net.au/news/2024-01-01/story">three</a>
        "#;

        let links = extract_article_links(html, ORIGIN, "2024-01-01").unwrap();
        assert_eq!(links, vec!["https://www.abc.net.au/news/2024-01-01/story"]);
    }

    #[test]
    fn test_no_qualifying_links() {
        let html = r#"<a href="/news/">News</a><a href="/news/2023-01-01/x">x</a>"#;
        let links = extract_article_links(html, ORIGIN, "2024-01-01").unwrap();
        assert!(links.is_empty());

        assert!(extract_article_links("", ORIGIN, "2024-01-01").unwrap().is_empty());
    }

    #[test]
    fn test_foreign_absolute_href_is_prefixed_verbatim() {
        let html = r#"<a href="https://mirror.example/news/2024-01-01/x">x</a>"#;
        let links = extract_article_links(html, ORIGIN, "2024-01-01").unwrap();
        assert_eq!(
            links,
            vec!["https://www.abc.net.auhttps://mirror.example/news/2024-01-01/x"]
        );
    }

    #[test]
    fn test_paragraphs_joined_with_single_space() {
        let html = "<html><body><p>A</p><div>skip</div><p>B</p></body></html>";
        assert_eq!(extract_paragraph_text(html).unwrap(), "A B");
    }

    #[test]
    fn test_paragraph_text_includes_inline_children() {
        let html = "<p>The <strong>ASX</strong> rose</p><p>Then <a href='#'>fell</a>.</p>";
        assert_eq!(extract_paragraph_text(html).unwrap(), "The ASX rose Then fell.");
    }

    #[test]
    fn test_malformed_html_is_tolerated() {
        assert_eq!(extract_paragraph_text("<p>unclosed <b>bold").unwrap(), "unclosed bold");
        assert_eq!(extract_paragraph_text("no paragraphs").unwrap(), "");
    }

    #[tokio::test]
    async fn test_index_articles_reads_homepage() {
        let site = SiteConfig::default();
        let config = ScanConfig::console(&site, KeywordSet::parse("asx"));
        let fetcher = pages(&[(
            "https://www.abc.net.au/news/",
            r#"<a href="/news/2024-01-01/story">story</a>"#,
        )]);

        let urls = index_articles(&fetcher, &config, "2024-01-01").await.unwrap();
        assert_eq!(urls, vec!["https://www.abc.net.au/news/2024-01-01/story"]);
    }

    #[tokio::test]
    async fn test_index_articles_propagates_homepage_failure() {
        let site = SiteConfig::default();
        let config = ScanConfig::console(&site, KeywordSet::parse("asx"));
        let fetcher = pages(&[]);

        let err = index_articles(&fetcher, &config, "2024-01-01").await.unwrap_err();
        assert!(matches!(err, ScoutError::Network { .. }));
    }

    #[tokio::test]
    async fn test_fetch_article() {
        let url = "https://www.abc.net.au/news/2024-01-01/story";
        let fetcher = pages(&[(url, "<p>First.</p><p>Second.</p>")]);

        let article = fetch_article(&fetcher, url).await.unwrap();
        assert_eq!(article.source, url);
        assert_eq!(article.content, "First. Second.");
    }
}
