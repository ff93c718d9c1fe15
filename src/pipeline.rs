//! The scan pipeline: index, fetch, filter, analyze.
//!
//! One link is fully fetched, filtered and (optionally) analyzed before the
//! next one starts. Progress is reported through a [`ScanSink`] so the
//! console and the interactive form can render the same run differently.

use crate::api::{AskAsync, analyze_article};
use crate::config::{AnalysisFailurePolicy, ScanConfig};
use crate::error::{ModelError, ScoutError};
use crate::fetch::Fetch;
use crate::models::{MatchedArticle, NewsArticle, ScanReport};
use crate::scrapers::abc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Receives pipeline events as they happen.
///
/// Every method has an empty default so a sink only implements what it shows.
pub trait ScanSink {
    fn links_discovered(&mut self, _date: &str, _total: usize, _limit: usize) {}
    fn article_started(&mut self, _url: &str) {}
    fn article_unreadable(&mut self, _url: &str, _error: &ScoutError) {}
    fn article_skipped(&mut self, _url: &str) {}
    fn article_matched(&mut self, _article: &NewsArticle) {}
    fn analysis_started(&mut self, _url: &str) {}
    fn analysis_ready(&mut self, _url: &str, _analysis: &str) {}
    fn analysis_failed(&mut self, _url: &str, _error: &ModelError) {}
    fn finished(&mut self, _report: &ScanReport) {}
}

/// Run one scan for `date_token`.
///
/// Fetch failures on individual articles are reported and skipped. A
/// homepage failure, or an analysis failure under
/// [`AnalysisFailurePolicy::Abort`], ends the run with an error.
///
/// # Arguments
///
/// * `fetcher` - Source of homepage and article bodies
/// * `asker` - Model client; only called when `config.analyze` is set
/// * `config` - Keywords, link limit and failure policy for this run
/// * `date_token` - Date in `YYYY-MM-DD` form used to select article links
/// * `sink` - Receives progress events in order
///
/// # Returns
///
/// A [`ScanReport`] with the counts and every matched article, including
/// analyses or per-article analysis errors.
///
/// # Errors
///
/// * [`ScoutError::Network`] if the homepage cannot be fetched
/// * [`ScoutError::Model`] if an analysis fails under [`AnalysisFailurePolicy::Abort`]
#[instrument(level = "info", skip_all, fields(date = date_token, limit = config.link_limit, analyze = config.analyze))]
pub async fn run_scan<F, A, S>(
    fetcher: &F,
    asker: &A,
    config: &ScanConfig,
    date_token: &str,
    sink: &mut S,
) -> Result<ScanReport, ScoutError>
where
    F: Fetch,
    A: AskAsync<Response = String>,
    S: ScanSink + ?Sized,
{
    let t0 = Instant::now();
    let mut report = ScanReport::new(date_token);

    let links = abc::index_articles(fetcher, config, date_token).await?;
    report.links_found = links.len();
    sink.links_discovered(date_token, links.len(), config.link_limit);

    for url in links.iter().take(config.link_limit) {
        report.links_examined += 1;
        sink.article_started(url);

        let article = match abc::fetch_article(fetcher, url).await {
            Ok(article) => article,
            Err(e) => {
                error!(%url, error = %e, "Article fetch failed; skipping");
                report.fetch_failures += 1;
                sink.article_unreadable(url, &e);
                continue;
            }
        };

        if !config.keywords.matches(&article.content) {
            debug!(%url, "No keywords found");
            sink.article_skipped(url);
            continue;
        }

        info!(%url, "Keyword match");
        sink.article_matched(&article);
        let mut matched = MatchedArticle::from_article(article);

        if config.analyze {
            sink.analysis_started(url);
            match analyze_article(asker, &matched.content, config.analysis_char_budget).await {
                Ok(analysis) => {
                    sink.analysis_ready(url, &analysis);
                    matched.analysis = Some(analysis);
                }
                Err(e) => match config.on_analysis_error {
                    AnalysisFailurePolicy::Abort => {
                        error!(%url, error = %e, "Analysis failed; aborting scan");
                        return Err(e.into());
                    }
                    AnalysisFailurePolicy::Continue => {
                        warn!(%url, error = %e, "Analysis failed; continuing");
                        sink.analysis_failed(url, &e);
                        matched.analysis_error = Some(e.to_string());
                    }
                },
            }
        }

        report.matched.push(matched);
    }

    info!(
        links_found = report.links_found,
        examined = report.links_examined,
        matched = report.matched_count(),
        analyzed = report.analyzed_count(),
        fetch_failures = report.fetch_failures,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Scan complete"
    );
    sink.finished(&report);
    Ok(report)
}
