//! # ABC News Scout
//!
//! Scans the ABC News homepage for articles published today, keeps the ones
//! whose text mentions any of a set of keywords, and optionally asks an
//! OpenAI-compatible model for an investor-style analysis of each match.
//!
//! ## Usage
//!
//! ```sh
//! abc_news_scout scan -k "asx, tariffs"
//! abc_news_scout interactive
//! ```
//!
//! ## Architecture
//!
//! The application is a straight-line pipeline, one article at a time:
//! 1. **Indexing**: collect same-day article URLs from the homepage
//! 2. **Fetching**: download each article and keep its paragraph text
//! 3. **Filtering**: keep articles mentioning a keyword
//! 4. **Analysis**: optionally send the first 3000 characters to the model
//!
//! Both commands share that pipeline and differ only in link limit, output
//! layout, and whether a failed analysis stops the run.

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod fetch;
mod filter;
mod interactive;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use api::{ChatCompletionClient, RetryAsk};
use cli::{Cli, Command, InteractiveArgs, ScanArgs};
use config::{CONSOLE_KEYWORDS, FileConfig, ModelConfig, ScanConfig, SiteConfig};
use fetch::HttpFetcher;
use filter::KeywordSet;
use interactive::FormOptions;
use outputs::{console::ConsoleSink, json};
use utils::{ensure_writable_dir, time_of_day, today_token};

/// Settings resolved from flags, environment, config file and defaults.
struct Resolved {
    site: SiteConfig,
    model: ModelConfig,
    file: FileConfig,
    timeout: Option<Duration>,
}

fn resolve(cli: &Cli, file: FileConfig) -> Result<Resolved, Box<dyn Error>> {
    let origin = cli
        .origin
        .as_deref()
        .or(file.origin.as_deref())
        .unwrap_or(config::DEFAULT_ORIGIN);
    let homepage = cli
        .homepage
        .as_deref()
        .or(file.homepage.as_deref())
        .unwrap_or(config::DEFAULT_HOMEPAGE);
    let site = SiteConfig::new(origin, homepage)?;

    let defaults = ModelConfig::default();
    let model = ModelConfig {
        api_key: cli
            .api_key
            .clone()
            .or_else(|| std::env::var("OPEN_API_KEY").ok()),
        api_base: cli
            .api_base
            .clone()
            .or_else(|| file.api_base.clone())
            .unwrap_or(defaults.api_base),
        model: cli
            .model
            .clone()
            .or_else(|| file.model.clone())
            .unwrap_or(defaults.model),
        temperature: defaults.temperature,
        max_retries: cli
            .max_retries
            .or(file.max_retries)
            .unwrap_or(defaults.max_retries),
    };

    let timeout = cli
        .timeout_secs
        .or(file.timeout_secs)
        .map(Duration::from_secs);

    Ok(Resolved {
        site,
        model,
        file,
        timeout,
    })
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("abc_news_scout starting up");

    let cli = Cli::parse();
    debug!(command = ?cli.command, config = ?cli.config, "Parsed CLI arguments");

    let file = match &cli.config {
        Some(path) => FileConfig::load(path).await?,
        None => FileConfig::default(),
    };
    let resolved = resolve(&cli, file)?;
    debug!(site = ?resolved.site, model = ?resolved.model, "Resolved configuration");

    let http = Client::builder();
    let http = match resolved.timeout {
        Some(timeout) => http.timeout(timeout),
        None => http,
    }
    .build()?;
    let fetcher = HttpFetcher::new(resolved.timeout)?;
    let max_retries = resolved.model.max_retries;
    let asker = RetryAsk::new(
        ChatCompletionClient::new(http, resolved.model.clone()),
        max_retries,
        Duration::from_secs(1),
    );

    let date = cli.date.clone().unwrap_or_else(today_token);

    match cli.command {
        Some(Command::Interactive(args)) => {
            run_interactive(&fetcher, &asker, &resolved, cli.date.clone(), args).await?
        }
        Some(Command::Scan(args)) => run_console(&fetcher, &asker, &resolved, &date, args).await?,
        None => run_console(&fetcher, &asker, &resolved, &date, ScanArgs::default()).await?,
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

async fn run_console<A>(
    fetcher: &HttpFetcher,
    asker: &A,
    resolved: &Resolved,
    date: &str,
    args: ScanArgs,
) -> Result<(), Box<dyn Error>>
where
    A: api::AskAsync<Response = String>,
{
    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let keywords = match (&args.keywords, &resolved.file.keywords) {
        (Some(input), _) => KeywordSet::parse(input),
        (None, Some(list)) => list.iter().collect(),
        (None, None) => CONSOLE_KEYWORDS.iter().collect(),
    };
    if keywords.is_empty() {
        return Err(Box::new(error::ScoutError::Config(
            "at least one keyword is required".to_string(),
        )));
    }

    let mut config = ScanConfig::console(&resolved.site, keywords)
        .with_link_limit(resolved.file.link_limit)
        .with_link_limit(args.limit);
    config.analyze = !args.skip_analysis;
    info!(keywords = %config.keywords, count = config.keywords.len(), limit = config.link_limit, "Keyword set ready");

    println!("Scraping ABC News...");
    let mut sink = ConsoleSink::stdout();
    let report = pipeline::run_scan(fetcher, asker, &config, date, &mut sink).await?;

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_report(&report, dir, &time_of_day()).await {
            error!(error = %e, "Failed to write JSON report");
        }
    }
    Ok(())
}

async fn run_interactive<A>(
    fetcher: &HttpFetcher,
    asker: &A,
    resolved: &Resolved,
    date: Option<String>,
    args: InteractiveArgs,
) -> Result<(), Box<dyn Error>>
where
    A: api::AskAsync<Response = String>,
{
    if let Some(dir) = &args.json_output_dir {
        ensure_writable_dir(dir).await?;
    }

    let options = FormOptions {
        site: resolved.site.clone(),
        link_limit: args.limit.or(resolved.file.link_limit),
        date,
        json_output_dir: args.json_output_dir,
    };
    interactive::run(fetcher, asker, &options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let cli = Cli::parse_from(["abc_news_scout", "--api-key", "sk-test"]);
        let resolved = resolve(&cli, FileConfig::default()).unwrap();

        assert_eq!(resolved.site, SiteConfig::default());
        assert_eq!(resolved.model.model, "gpt-4o");
        assert_eq!(resolved.model.api_key.as_deref(), Some("sk-test"));
        assert_eq!(resolved.model.max_retries, 0);
        assert!((resolved.model.temperature - 0.1).abs() < f32::EPSILON);
        assert!(resolved.timeout.is_none());
    }

    // Uses only settings that have no environment fallback.
    #[test]
    fn test_cli_overrides_file() {
        let cli = Cli::parse_from(["abc_news_scout", "--model", "gpt-4o-mini", "--timeout-secs", "5"]);
        let file = FileConfig {
            model: Some("from-file".to_string()),
            homepage: Some("https://example.com/news/".to_string()),
            max_retries: Some(2),
            timeout_secs: Some(60),
            ..FileConfig::default()
        };
        let resolved = resolve(&cli, file).unwrap();

        assert_eq!(resolved.model.model, "gpt-4o-mini");
        assert_eq!(resolved.site.homepage, "https://example.com/news/");
        assert_eq!(resolved.model.max_retries, 2);
        assert_eq!(resolved.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_cli_api_base_overrides_file() {
        let cli = Cli::parse_from(["abc_news_scout", "--api-base", "http://cli/v1"]);
        let file = FileConfig {
            api_base: Some("http://localhost:8080/v1".to_string()),
            ..FileConfig::default()
        };
        let resolved = resolve(&cli, file).unwrap();
        assert_eq!(resolved.model.api_base, "http://cli/v1");
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let cli = Cli::parse_from(["abc_news_scout", "--origin", "not a url"]);
        assert!(resolve(&cli, FileConfig::default()).is_err());
    }
}
