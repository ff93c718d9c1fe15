//! Command-line interface definitions for ABC News Scout.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Connection settings can also come from environment variables or a YAML
//! config file; command-line flags take precedence.

use crate::utils::parse_date_token;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for ABC News Scout.
///
/// # Examples
///
/// ```sh
/// # Console scan with the default keywords (same as `abc_news_scout scan`)
/// abc_news_scout
///
/// # Custom keywords, no model calls, JSON report
/// abc_news_scout scan -k "rba, housing" --skip-analysis -j ./reports
///
/// # Interactive form
/// abc_news_scout interactive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API key for the chat-completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Model used for the analysis
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Canonical site origin prepended to relative article links
    #[arg(long, global = true)]
    pub origin: Option<String>,

    /// Page scanned for same-day article links
    #[arg(long, global = true)]
    pub homepage: Option<String>,

    /// HTTP timeout in seconds (no timeout when unset)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Extra attempts for a failed model call
    #[arg(long, global = true)]
    pub max_retries: Option<usize>,

    /// Scan this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true, value_parser = parse_date_arg)]
    pub date: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan with a fixed keyword list and print every match
    Scan(ScanArgs),
    /// Prompt for keywords and whether to analyze, then scan
    Interactive(InteractiveArgs),
}

#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Comma-separated keywords
    #[arg(short, long)]
    pub keywords: Option<String>,

    /// Maximum number of articles to examine (default 10)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Print matches without calling the model
    #[arg(long)]
    pub skip_analysis: bool,

    /// Output directory for the JSON report
    #[arg(short, long)]
    pub json_output_dir: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct InteractiveArgs {
    /// Maximum number of articles to examine per run (default 50)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output directory for the JSON report of each run
    #[arg(short, long)]
    pub json_output_dir: Option<String>,
}

fn parse_date_arg(s: &str) -> Result<String, String> {
    parse_date_token(s).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::parse_from(["abc_news_scout"]);
        assert!(cli.command.is_none());
        assert!(cli.date.is_none());
    }

    #[test]
    fn test_scan_flags() {
        let cli = Cli::parse_from([
            "abc_news_scout",
            "scan",
            "-k",
            "rba, housing",
            "-l",
            "5",
            "--skip-analysis",
            "-j",
            "/tmp/json",
        ]);

        let Some(Command::Scan(args)) = cli.command else {
            panic!("expected scan subcommand");
        };
        assert_eq!(args.keywords.as_deref(), Some("rba, housing"));
        assert_eq!(args.limit, Some(5));
        assert!(args.skip_analysis);
        assert_eq!(args.json_output_dir.as_deref(), Some("/tmp/json"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "abc_news_scout",
            "interactive",
            "--model",
            "gpt-4o-mini",
            "--date",
            "2024-01-01",
            "--max-retries",
            "2",
        ]);

        assert!(matches!(cli.command, Some(Command::Interactive(_))));
        assert_eq!(cli.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(cli.date.as_deref(), Some("2024-01-01"));
        assert_eq!(cli.max_retries, Some(2));
    }

    #[test]
    fn test_invalid_date_rejected() {
        let res = Cli::try_parse_from(["abc_news_scout", "--date", "yesterday"]);
        assert!(res.is_err());
    }
}
