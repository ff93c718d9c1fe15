//! News site scrapers.
//!
//! Each scraper follows the same two-phase pattern:
//!
//! 1. **Indexing**: discover same-day article URLs from the site's homepage
//! 2. **Fetching**: download an article page and reduce it to plain text
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | ABC News (Australia) | [`abc`] | HTML scraping | Articles live under `/news/<YYYY-MM-DD>/` |
//!
//! Scrapers never fetch directly; they take any [`crate::fetch::Fetch`]
//! so the parsing can be exercised against canned HTML.

pub mod abc;
