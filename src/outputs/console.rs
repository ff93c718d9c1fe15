//! Human-readable renderings of a scan.
//!
//! [`ConsoleSink`] prints a line-by-line log with full article text, for
//! the `scan` command. [`FormSink`] prints the compact layout used by the
//! interactive form: a preview per match, analyses, and a closing status.

use crate::config::FORM_PREVIEW_CHARS;
use crate::error::{ModelError, ScoutError};
use crate::models::{NewsArticle, ScanReport};
use crate::pipeline::ScanSink;
use crate::utils::preview;
use std::io::{self, Write};

const DIVIDER: &str = "------------------------------------------------------------";

/// Writes output lines, ignoring a closed stdout.
fn emit<W: Write>(out: &mut W, text: std::fmt::Arguments<'_>) {
    let _ = writeln!(out, "{text}");
}

/// Line-by-line console output for the `scan` command.
pub struct ConsoleSink<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ScanSink for ConsoleSink<W> {
    fn links_discovered(&mut self, date: &str, total: usize, limit: usize) {
        emit(
            &mut self.out,
            format_args!("Found {total} articles for {date}. Filtering the first {}...", total.min(limit)),
        );
    }

    fn article_started(&mut self, url: &str) {
        emit(&mut self.out, format_args!("\nAnalyzing {url}"));
    }

    fn article_unreadable(&mut self, _url: &str, error: &ScoutError) {
        emit(&mut self.out, format_args!("Error reading article: {error}"));
    }

    fn article_skipped(&mut self, _url: &str) {
        emit(&mut self.out, format_args!("No relevant keywords found."));
    }

    fn article_matched(&mut self, article: &NewsArticle) {
        emit(&mut self.out, format_args!("Relevant keywords found."));
        emit(&mut self.out, format_args!("{}", article.content));
    }

    fn analysis_started(&mut self, _url: &str) {
        emit(&mut self.out, format_args!("Analyzing with the language model..."));
    }

    fn analysis_ready(&mut self, _url: &str, analysis: &str) {
        emit(&mut self.out, format_args!("{analysis}"));
    }

    fn analysis_failed(&mut self, url: &str, error: &ModelError) {
        emit(&mut self.out, format_args!("Analysis of {url} failed: {error}"));
    }

    fn finished(&mut self, report: &ScanReport) {
        emit(
            &mut self.out,
            format_args!(
                "\nMatched {} of {} examined article(s).",
                report.matched_count(),
                report.links_examined
            ),
        );
    }
}

/// Compact output for the interactive form.
pub struct FormSink<W: Write = io::Stdout> {
    out: W,
    preview_chars: usize,
    matched: usize,
}

impl FormSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> FormSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            preview_chars: FORM_PREVIEW_CHARS,
            matched: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ScanSink for FormSink<W> {
    fn links_discovered(&mut self, date: &str, total: usize, _limit: usize) {
        self.matched = 0;
        emit(&mut self.out, format_args!("Found {total} article(s) for {date}."));
    }

    fn article_matched(&mut self, article: &NewsArticle) {
        if self.matched > 0 {
            emit(&mut self.out, format_args!("{DIVIDER}"));
        }
        self.matched += 1;
        emit(&mut self.out, format_args!("\nMatched: {}", article.source));
        emit(
            &mut self.out,
            format_args!("{}", preview(&article.content, self.preview_chars)),
        );
    }

    fn article_unreadable(&mut self, _url: &str, error: &ScoutError) {
        emit(&mut self.out, format_args!("Skipped unreadable article: {error}"));
    }

    fn analysis_ready(&mut self, _url: &str, analysis: &str) {
        emit(&mut self.out, format_args!("\nAnalysis:"));
        for line in analysis.lines() {
            emit(&mut self.out, format_args!("    {line}"));
        }
    }

    fn analysis_failed(&mut self, _url: &str, error: &ModelError) {
        emit(&mut self.out, format_args!("Analysis failed: {error}"));
    }

    fn finished(&mut self, report: &ScanReport) {
        if report.matched_count() == 0 {
            emit(
                &mut self.out,
                format_args!("No relevant articles found with given keywords."),
            );
        } else {
            emit(&mut self.out, format_args!("{DIVIDER}"));
            emit(
                &mut self.out,
                format_args!("{} matching article(s).", report.matched_count()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchedArticle;

    fn article(content: &str) -> NewsArticle {
        NewsArticle {
            source: "https://www.abc.net.au/news/2024-01-01/story".to_string(),
            content: content.to_string(),
        }
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_console_prints_full_text() {
        let mut sink = ConsoleSink::new(Vec::new());
        let body = "x".repeat(800);
        sink.article_matched(&article(&body));
        sink.analysis_ready("u", "Hold.");

        let out = text(sink.into_inner());
        assert!(out.contains("Relevant keywords found."));
        assert!(out.contains(&body));
        assert!(out.ends_with("Hold.\n"));
    }

    #[test]
    fn test_console_progress_lines() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.links_discovered("2024-01-01", 25, 10);
        sink.article_started("https://a");
        sink.article_skipped("https://a");
        sink.article_unreadable("https://b", &ScoutError::network("https://b", "timed out"));

        let out = text(sink.into_inner());
        assert!(out.contains("Found 25 articles for 2024-01-01. Filtering the first 10..."));
        assert!(out.contains("\nAnalyzing https://a\n"));
        assert!(out.contains("No relevant keywords found."));
        assert!(out.contains("Error reading article: failed to fetch https://b: timed out"));
        assert_eq!(out.matches("https://b").count(), 1);
    }

    #[test]
    fn test_form_previews_first_500_chars() {
        let mut sink = FormSink::new(Vec::new());
        let body = format!("{}{}", "a".repeat(500), "b".repeat(100));
        sink.article_matched(&article(&body));

        let out = text(sink.into_inner());
        assert!(out.contains(&format!("{}...", "a".repeat(500))));
        assert!(!out.contains("bb"));
    }

    #[test]
    fn test_form_reports_inline_error() {
        let mut sink = FormSink::new(Vec::new());
        sink.analysis_failed("u", &ModelError::MissingApiKey);
        let out = text(sink.into_inner());
        assert!(out.starts_with("Analysis failed: no API key configured"));
    }

    #[test]
    fn test_form_reports_unreadable_article() {
        let mut sink = FormSink::new(Vec::new());
        sink.article_unreadable("https://b", &ScoutError::network("https://b", "connection reset"));
        let out = text(sink.into_inner());
        assert_eq!(
            out,
            "Skipped unreadable article: failed to fetch https://b: connection reset\n"
        );
    }

    #[test]
    fn test_form_warns_when_nothing_matched() {
        let mut sink = FormSink::new(Vec::new());
        sink.finished(&ScanReport::new("2024-01-01"));
        let out = text(sink.into_inner());
        assert_eq!(out, "No relevant articles found with given keywords.\n");
    }

    #[test]
    fn test_form_separates_matches() {
        let mut sink = FormSink::new(Vec::new());
        sink.article_matched(&article("one"));
        sink.article_matched(&article("two"));
        let mut report = ScanReport::new("2024-01-01");
        report.matched.push(MatchedArticle::from_article(article("one")));
        report.matched.push(MatchedArticle::from_article(article("two")));
        sink.finished(&report);

        let out = text(sink.into_inner());
        assert_eq!(out.matches(DIVIDER).count(), 2);
        assert!(out.ends_with("2 matching article(s).\n"));
    }
}
