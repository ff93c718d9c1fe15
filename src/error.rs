//! Error types shared by every stage of the scan.
//!
//! Each stage returns a [`Result`] so callers decide explicitly whether a
//! failure aborts the run or is reported and skipped.

use thiserror::Error;

/// Boxed transport error carried by [`ScoutError::Network`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while fetching, parsing, configuring or analyzing.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to parse {context}: {reason}")]
    Parse { context: String, reason: String },

    #[error("model analysis failed: {0}")]
    Model(#[from] ModelError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ScoutError {
    /// Build a [`ScoutError::Network`] for `url` from any transport error.
    pub fn network(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Network {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn parse(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failures of the chat-completion call.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("no API key configured (set OPENAI_API_KEY or pass --api-key)")]
    MissingApiKey,

    #[error("the API rejected the credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("rate limited or out of quota: {body}")]
    RateLimited { body: String },

    #[error("API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("request to the model endpoint failed: {0}")]
    Transport(String),

    #[error("could not decode model response: {0}")]
    InvalidResponse(String),

    #[error("model returned no completion text")]
    EmptyResponse,
}

impl ModelError {
    /// Classify a non-success HTTP status from the chat-completion endpoint.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status },
            429 => Self::RateLimited { body },
            _ => Self::Api { status, body },
        }
    }
}
