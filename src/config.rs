//! Runtime configuration for a scan.
//!
//! Settings are layered: command-line flags (and their environment
//! variables) win over an optional YAML file, which wins over the built-in
//! defaults below. The resolved [`ScanConfig`] and [`ModelConfig`] are
//! built once in `main` and passed by reference to every stage.

use crate::error::ScoutError;
use crate::filter::KeywordSet;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_ORIGIN: &str = "https://www.abc.net.au";
pub const DEFAULT_HOMEPAGE: &str = "https://www.abc.net.au/news/";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Keywords used by `scan` when none are given.
pub const CONSOLE_KEYWORDS: &[&str] = &["trump", "economics", "tariffs", "tech", "asx", "ASX"];
/// Keywords pre-filled in the interactive form.
pub const FORM_KEYWORDS: &str = "korea, trump, tech";

pub const CONSOLE_LINK_LIMIT: usize = 10;
pub const FORM_LINK_LIMIT: usize = 50;
/// Characters of article text sent to the model.
pub const ANALYSIS_CHAR_BUDGET: usize = 3000;
/// Characters of matched text shown by the interactive form.
pub const FORM_PREVIEW_CHARS: usize = 500;

/// What the pipeline does when the model call for one article fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisFailurePolicy {
    /// Stop the run and return the error.
    Abort,
    /// Report the error for that article and move on.
    Continue,
}

/// Everything the pipeline needs to run one scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Canonical site origin used to absolutize relative links.
    pub origin: String,
    /// Page scanned for same-day article links.
    pub homepage: String,
    /// Maximum number of discovered links visited.
    pub link_limit: usize,
    pub keywords: KeywordSet,
    pub analyze: bool,
    pub analysis_char_budget: usize,
    pub on_analysis_error: AnalysisFailurePolicy,
}

impl ScanConfig {
    /// Settings for the console scan: abort on the first analysis failure.
    pub fn console(site: &SiteConfig, keywords: KeywordSet) -> Self {
        Self {
            origin: site.origin.clone(),
            homepage: site.homepage.clone(),
            link_limit: CONSOLE_LINK_LIMIT,
            keywords,
            analyze: true,
            analysis_char_budget: ANALYSIS_CHAR_BUDGET,
            on_analysis_error: AnalysisFailurePolicy::Abort,
        }
    }

    /// Settings for the interactive form: keep going after analysis failures.
    pub fn form(site: &SiteConfig, keywords: KeywordSet, analyze: bool) -> Self {
        Self {
            origin: site.origin.clone(),
            homepage: site.homepage.clone(),
            link_limit: FORM_LINK_LIMIT,
            keywords,
            analyze,
            analysis_char_budget: ANALYSIS_CHAR_BUDGET,
            on_analysis_error: AnalysisFailurePolicy::Continue,
        }
    }

    pub fn with_link_limit(mut self, limit: Option<usize>) -> Self {
        if let Some(limit) = limit {
            self.link_limit = limit;
        }
        self
    }
}

/// The news site being scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub origin: String,
    pub homepage: String,
}

impl SiteConfig {
    /// Validate both URLs and strip any trailing slash from the origin.
    pub fn new(origin: &str, homepage: &str) -> Result<Self, ScoutError> {
        Url::parse(origin).map_err(|e| ScoutError::parse(format!("origin {origin}"), e))?;
        Url::parse(homepage).map_err(|e| ScoutError::parse(format!("homepage {homepage}"), e))?;
        Ok(Self {
            origin: origin.trim_end_matches('/').to_string(),
            homepage: homepage.to_string(),
        })
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            homepage: DEFAULT_HOMEPAGE.to_string(),
        }
    }
}

/// Connection settings for the chat-completion endpoint.
#[derive(Clone)]
pub struct ModelConfig {
    /// Bearer credential. Only checked when an analysis is requested.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_retries: usize,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_retries: 0,
        }
    }
}

/// Optional YAML configuration file.
///
/// ```yaml
/// origin: https://www.abc.net.au
/// homepage: https://www.abc.net.au/news/
/// keywords: [asx, tariffs]
/// link_limit: 20
/// model: gpt-4o-mini
/// api_base: https://api.openai.com/v1
/// max_retries: 2
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub origin: Option<String>,
    pub homepage: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub link_limit: Option<usize>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub max_retries: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_yaml(s: &str) -> Result<Self, ScoutError> {
        Ok(serde_yaml::from_str(s)?)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ScoutError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&raw)?;
        info!("Loaded configuration file");
        Ok(config)
    }
}
