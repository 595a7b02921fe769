//! Abstractions over the external summarization engine.
//!
//! The pipeline never talks to a model directly. It receives an `Arc<dyn SummarizationEngine>`
//! at construction and treats every call as an opaque request/response that either yields text
//! or an [`EngineError`]. The HTTP-backed adapters in this module mirror each other: build a
//! JSON payload, post it, and map transport, status, and decoding failures onto the error enum.

mod huggingface;
mod ollama;

pub use huggingface::HuggingFaceEngine;
pub use ollama::OllamaEngine;

use crate::config::{Config, SummarizationProvider};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
const DEFAULT_HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_HUGGINGFACE_MODEL: &str = "facebook/bart-large-cnn";

/// Errors surfaced by a summarization engine call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Provider was unreachable or could not be constructed.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
    /// Provider answered successfully but produced no text.
    #[error("Provider returned an empty summary")]
    EmptySummary,
}

/// Length bounds forwarded to the engine for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLength {
    /// Upper bound on the generated summary length.
    pub max_length: usize,
    /// Lower bound on the generated summary length.
    pub min_length: usize,
}

impl SummaryLength {
    /// Construct a new pair of bounds.
    pub const fn new(max_length: usize, min_length: usize) -> Self {
        Self {
            max_length,
            min_length,
        }
    }
}

/// Request payload passed to the summarization engine.
#[derive(Debug, Clone)]
pub struct SummarizationRequest {
    /// Text to condense.
    pub text: String,
    /// Length bounds for the generated summary.
    pub length: SummaryLength,
}

/// Interface implemented by summarization backends.
#[async_trait]
pub trait SummarizationEngine: Send + Sync {
    /// Summarize the request text within the requested length bounds.
    async fn summarize(&self, request: SummarizationRequest) -> Result<String, EngineError>;
}

/// Build the configured summarization engine.
///
/// The returned handle is meant to be created once per process and shared by every pipeline run.
pub fn build_engine(config: &Config) -> Result<Arc<dyn SummarizationEngine>, EngineError> {
    let http = build_http_client(config.summarization_timeout_secs)?;
    let engine: Arc<dyn SummarizationEngine> = match config.summarization_provider {
        SummarizationProvider::HuggingFace => Arc::new(HuggingFaceEngine::new(
            http,
            config
                .huggingface_url
                .clone()
                .unwrap_or_else(|| DEFAULT_HUGGINGFACE_URL.to_string()),
            config
                .summarization_model
                .clone()
                .unwrap_or_else(|| DEFAULT_HUGGINGFACE_MODEL.to_string()),
            config.huggingface_api_token.clone(),
        )),
        SummarizationProvider::Ollama => Arc::new(OllamaEngine::new(
            http,
            config
                .ollama_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            config
                .summarization_model
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        )),
    };
    tracing::info!(
        provider = ?config.summarization_provider,
        model = ?config.summarization_model,
        "Summarization engine initialized"
    );
    Ok(engine)
}

fn build_http_client(timeout_secs: Option<u64>) -> Result<Client, EngineError> {
    let mut builder = Client::builder().user_agent("papersynth/summary");
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(|error| {
        EngineError::ProviderUnavailable(format!("failed to construct HTTP client: {error}"))
    })
}

/// Read an error body without letting a decode failure mask the status code.
async fn error_body(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}
