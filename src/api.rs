//! LLM API interaction for the investor analysis.
//!
//! This module sends matched article text to an OpenAI-compatible
//! chat-completion endpoint and returns the model's analysis.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait defining async LLM interaction
//! - [`ChatCompletionClient`]: `reqwest` client for `POST /chat/completions`
//! - [`RetryAsk`]: decorator that adds retry logic to any `AskAsync` implementation
//! - [`analyze_article`]: truncates the article to the character budget and asks
//!
//! # Retry Strategy
//!
//! Retries are off unless `--max-retries` is set. When enabled:
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::utils::{truncate_chars, truncate_for_log};
use rand::{Rng, rng};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Fixed system instruction sent with every analysis.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert investor and to save the cute kittens from dying, you have to analyse any text given to you and give the best quality assessments possible. Do not let the cute kittens die.";

/// User prompt preamble; the article text follows it.
pub const ANALYSIS_PROMPT: &str = "As an investor with 50 years of experience, provide a comprehensive analysis of the current market trends in the [industry]. Your analysis should include identifying key growth areas, potential risks, and emerging opportunities based on current and forecasted market conditions. You should use your extensive investment experience to provide insights and recommendations for future investment strategies. Your analysis should be presented in a clear and concise report that can be understood by both industry experts and those less familiar with the industry.";

/// Build the user message for one article.
pub fn build_prompt(article: &str) -> String {
    format!("\n{ANALYSIS_PROMPT}\n\nArticle:\n{article}\n\n")
}

/// Trait for async LLM interaction.
///
/// Implementors send text to an LLM and receive a response. The pipeline
/// only depends on this trait, so decorators and test doubles slot in.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send text to the LLM and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, ModelError>;
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
///
/// Missing or rejected credentials are never retried.
pub struct RetryAsk<T> {
    /// The underlying LLM client to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Create a new retry wrapper around an existing [`AskAsync`] implementation.
    ///
    /// `max_retries` of 0 makes exactly one attempt.
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    fn backoff_delay(&self, attempt: usize) -> StdDuration {
        let shift = (attempt.saturating_sub(1)).min(31) as u32;
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

fn is_retryable(e: &ModelError) -> bool {
    !matches!(
        e,
        ModelError::MissingApiKey | ModelError::Unauthorized { .. }
    )
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, ModelError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(text).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries || !is_retryable(&e) {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "ask() giving up"
                        );
                        return Err(e);
                    }

                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = self.backoff_delay(attempt) + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Pull the first completion's text out of a chat-completion response body.
fn first_completion(body: &str) -> Result<String, ModelError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ModelError::InvalidResponse(format!("{e}: {}", truncate_for_log(body, 300))))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(ModelError::EmptyResponse)
}

/// [`AskAsync`] implementation talking to an OpenAI-compatible endpoint.
///
/// Every request carries the fixed system instruction and wraps the text
/// in the investor-analysis prompt.
pub struct ChatCompletionClient {
    client: Client,
    config: ModelConfig,
}

impl fmt::Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("config", &self.config)
            .finish()
    }
}

impl ChatCompletionClient {
    pub fn new(client: Client, config: ModelConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }
}

impl AskAsync for ChatCompletionClient {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(model = %self.config.model))]
    async fn ask(&self, text: &str) -> Result<Self::Response, ModelError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ModelError::MissingApiKey)?;

        let prompt = build_prompt(text);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.config.temperature,
        };

        let t0 = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;
        let dt = t0.elapsed();

        if !status.is_success() {
            warn!(
                elapsed_ms = dt.as_millis() as u64,
                %status,
                body = %truncate_for_log(&body, 300),
                "API call failed"
            );
            return Err(ModelError::from_status(status.as_u16(), body));
        }

        let completion = first_completion(&body)?;
        info!(
            elapsed_ms = dt.as_millis() as u64,
            chars = completion.chars().count(),
            "Received analysis"
        );
        Ok(completion)
    }
}

/// Ask for an investor analysis of `article`, sending at most `budget` characters.
///
/// # Arguments
///
/// * `asker` - Any [`AskAsync`] implementation, usually a [`RetryAsk`] around [`ChatCompletionClient`]
/// * `article` - Full article text
/// * `budget` - Maximum number of characters forwarded to the model
///
/// # Returns
///
/// The model's analysis text.
///
/// # Errors
///
/// Returns the [`ModelError`] from the underlying `ask` call unchanged.
#[instrument(level = "info", skip(asker, article))]
pub async fn analyze_article<A>(asker: &A, article: &str, budget: usize) -> Result<String, ModelError>
where
    A: AskAsync<Response = String>,
{
    let t0 = Instant::now();
    let text = truncate_chars(article, budget);
    let res = asker.ask(text).await;
    let dt = t0.elapsed();

    match &res {
        Ok(_) => info!(
            elapsed_ms_total = dt.as_millis() as u64,
            sent_chars = text.chars().count(),
            "analyze_article succeeded"
        ),
        Err(e) => {
            error!(elapsed_ms_total = dt.as_millis() as u64, error = %e, "analyze_article failed")
        }
    }
    res
}
