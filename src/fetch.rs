//! HTTP page fetching.
//!
//! [`Fetch`] is the seam between the scrapers and the network: production
//! code uses [`HttpFetcher`], tests substitute in-memory pages.

use crate::error::ScoutError;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Something that can turn a URL into page text.
pub trait Fetch {
    /// GET `url` and return the response body as text.
    async fn fetch_text(&self, url: &str) -> Result<String, ScoutError>;
}

/// [`Fetch`] implementation backed by a shared `reqwest` client.
///
/// One GET per call, no retries. The body is returned whatever the HTTP
/// status; non-success statuses are only logged.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher. `timeout` of `None` keeps the client default (no timeout).
    pub fn new(timeout: Option<Duration>) -> Result<Self, ScoutError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ScoutError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String, ScoutError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScoutError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Non-success status; using body anyway");
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScoutError::network(url, e))?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
