//! Keyword filter gating which articles are shown and analyzed.
//!
//! Matching is a case-insensitive substring test with no notion of word
//! boundaries: `"tech"` matches `"biotech"` and `"tariff"` matches
//! `"tariffs"`.

use itertools::Itertools;

/// An ordered, immutable list of lower-cased keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Parse comma-separated user input such as `"korea, trump , tech"`.
    ///
    /// Entries are trimmed; empty entries are dropped since an empty
    /// keyword would match every article.
    pub fn parse(input: &str) -> Self {
        Self::from_iter(input.split(','))
    }

    /// True if any keyword occurs anywhere in `text`, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        let text_lower = text.to_lowercase();
        self.keywords.iter().any(|kw| text_lower.contains(kw.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let keywords = iter
            .into_iter()
            .map(|kw| kw.as_ref().trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .unique()
            .collect();
        Self { keywords }
    }
}

impl std::fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iter().join(", "))
    }
}
