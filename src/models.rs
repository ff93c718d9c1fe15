//! Data models for scraped articles and scan results.
//!
//! - [`NewsArticle`]: raw paragraph text scraped from one article page
//! - [`MatchedArticle`]: an article that passed the keyword filter, plus its analysis
//! - [`ScanReport`]: everything a single run discovered and matched

use serde::{Deserialize, Serialize};

/// A raw news article as scraped from the site.
///
/// Lives for one pipeline iteration; nothing holds on to it afterwards
/// except a [`MatchedArticle`] copy when the keyword filter passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsArticle {
    /// The URL the article was fetched from.
    pub source: String,
    /// Paragraph text joined with single spaces.
    pub content: String,
}

/// An article whose text contained at least one keyword.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchedArticle {
    pub url: String,
    pub content: String,
    /// The model's analysis, when analysis was enabled and succeeded.
    pub analysis: Option<String>,
    /// The error message, when analysis was enabled and failed.
    pub analysis_error: Option<String>,
}

impl MatchedArticle {
    pub fn from_article(article: NewsArticle) -> Self {
        Self {
            url: article.source,
            content: article.content,
            analysis: None,
            analysis_error: None,
        }
    }
}

/// Summary of one scan run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScanReport {
    /// The date token used to select articles, `YYYY-MM-DD`.
    pub date: String,
    /// Number of distinct same-day links found on the homepage.
    pub links_found: usize,
    /// Number of links actually visited (bounded by the link limit).
    pub links_examined: usize,
    /// Links whose page could not be fetched.
    pub fetch_failures: usize,
    pub matched: Vec<MatchedArticle>,
}

impl ScanReport {
    pub fn new(date: &str) -> Self {
        Self {
            date: date.to_string(),
            ..Self::default()
        }
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// Number of matched articles the model analyzed successfully.
    pub fn analyzed_count(&self) -> usize {
        self.matched.iter().filter(|m| m.analysis.is_some()).count()
    }
}
