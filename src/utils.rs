//! Utility functions for dates, string truncation, and file system checks.
//!
//! - Date token and edition naming for reports
//! - Character-safe truncation for model input, previews and logging
//! - Output directory validation

use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Today's local date as an ISO `YYYY-MM-DD` token.
pub fn today_token() -> String {
    Local::now().date_naive().to_string()
}

/// Validate a user-supplied date token, returning it normalized.
pub fn parse_date_token(s: &str) -> Result<String, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(|d| d.to_string())
}

/// Classify a time of day into an edition name.
///
/// - **Morning**: 00:00 - 08:00
/// - **Afternoon**: 08:00 - 16:00
/// - **Evening**: 16:00 - 24:00
pub fn edition_for(time: NaiveTime) -> &'static str {
    match time.hour() {
        0..=7 => "morning",
        8..=15 => "afternoon",
        _ => "evening",
    }
}

/// Edition name for the current local time.
#[instrument]
pub fn time_of_day() -> String {
    let tod = Local::now().time();
    let which = edition_for(tod);
    tracing::debug!(%tod, %which, "Computed time_of_day");
    which.to_string()
}

/// Keep at most `max` characters of `s`.
///
/// Counts `char`s rather than bytes so multi-byte text is never split.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Short preview of `s`: the first `max` characters followed by `...`.
pub fn preview(s: &str, max: usize) -> String {
    format!("{}...", truncate_chars(s, max))
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended.
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let kept = truncate_chars(s, max);
    if kept.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", kept, s.len() - kept.len())
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_string() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn test_truncate_chars_caps_length() {
        let s = "x".repeat(5000);
        assert_eq!(truncate_chars(&s, 3000).chars().count(), 3000);
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        let s = "é".repeat(10);
        let cut = truncate_chars(&s, 4);
        assert_eq!(cut, "éééé");
        assert_eq!(cut.len(), 8);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("ab", 3), "ab...");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_edition_boundaries() {
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(edition_for(at(0, 0)), "morning");
        assert_eq!(edition_for(at(7, 59)), "morning");
        assert_eq!(edition_for(at(8, 0)), "afternoon");
        assert_eq!(edition_for(at(15, 59)), "afternoon");
        assert_eq!(edition_for(at(16, 0)), "evening");
        assert_eq!(edition_for(at(23, 59)), "evening");
    }

    #[test]
    fn test_today_token_is_iso() {
        let token = today_token();
        assert_eq!(token.len(), 10);
        assert!(parse_date_token(&token).is_ok());
    }

    #[test]
    fn test_parse_date_token() {
        assert_eq!(parse_date_token(" 2024-01-01 ").unwrap(), "2024-01-01");
        assert!(parse_date_token("01/01/2024").is_err());
        assert!(parse_date_token("2024-13-01").is_err());
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("reports/nested");
        let path = nested.to_str().unwrap();

        ensure_writable_dir(path).await.unwrap();
        assert!(nested.is_dir());
    }
}
