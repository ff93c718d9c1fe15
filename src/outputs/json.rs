//! JSON report output.
//!
//! Serializes a [`ScanReport`] so other tools can consume the matches and
//! analyses of a run.
//!
//! # Output Structure
//!
//! Files are organized by scan date with edition names:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```
//!
//! A later run in the same edition overwrites the earlier file.

use crate::error::ScoutError;
use crate::models::ScanReport;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the report file for `date` and `edition` under `json_output_dir`.
pub fn report_path(json_output_dir: &str, date: &str, edition: &str) -> PathBuf {
    PathBuf::from(json_output_dir)
        .join(date)
        .join(format!("{edition}.json"))
}

/// Write `report` to `{json_output_dir}/{date}/{edition}.json`.
///
/// # Arguments
///
/// * `report` - The finished scan
/// * `json_output_dir` - Root directory for reports; the date directory is created if missing
/// * `edition` - `morning`, `afternoon` or `evening`
///
/// # Returns
///
/// The path written.
///
/// # Errors
///
/// Returns an error if serialization fails or the directory or file cannot be written.
#[instrument(level = "info", skip(report), fields(date = %report.date))]
pub async fn write_report(
    report: &ScanReport,
    json_output_dir: &str,
    edition: &str,
) -> Result<PathBuf, ScoutError> {
    let json = serde_json::to_string_pretty(report)?;
    let path = report_path(json_output_dir, &report.date, edition);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), matched = report.matched_count(), "Wrote JSON report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchedArticle;

    #[test]
    fn test_report_path() {
        let path = report_path("/tmp/out", "2025-05-06", "evening");
        assert_eq!(path, PathBuf::from("/tmp/out/2025-05-06/evening.json"));
    }

    #[tokio::test]
    async fn test_write_report_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();

        let mut report = ScanReport::new("2024-01-01");
        report.links_found = 3;
        report.links_examined = 3;
        report.matched.push(MatchedArticle {
            url: "https://www.abc.net.au/news/2024-01-01/story".to_string(),
            content: "ASX closes higher".to_string(),
            analysis: Some("Cautiously bullish.".to_string()),
            analysis_error: None,
        });

        let path = write_report(&report, dir, "morning").await.unwrap();
        assert!(path.ends_with("2024-01-01/morning.json"));

        let written: ScanReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.links_found, 3);
        assert_eq!(written.matched.len(), 1);
        assert_eq!(
            written.matched[0].analysis.as_deref(),
            Some("Cautiously bullish.")
        );
    }
}
