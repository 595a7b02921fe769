use super::{EngineError, SummarizationEngine, SummarizationRequest, error_body};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

/// Engine backed by the Hugging Face inference API summarization task.
///
/// Defaults to `facebook/bart-large-cnn`; any seq2seq summarization model served under
/// `{base_url}/models/{model}` works.
pub struct HuggingFaceEngine {
    http: Client,
    base_url: String,
    model: String,
    api_token: Option<String>,
}

impl HuggingFaceEngine {
    /// Create an engine targeting `model` under `base_url`.
    pub fn new(http: Client, base_url: String, model: String, api_token: Option<String>) -> Self {
        Self {
            http,
            base_url,
            model,
            api_token,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.base_url.trim_end_matches('/'),
            self.model.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Summaries(Vec<SummaryItem>),
    Error { error: String },
}

#[async_trait]
impl SummarizationEngine for HuggingFaceEngine {
    async fn summarize(&self, request: SummarizationRequest) -> Result<String, EngineError> {
        let payload = json!({
            "inputs": request.text,
            "parameters": {
                "max_length": request.length.max_length,
                "min_length": request.length.min_length,
                "do_sample": false,
            },
            "options": {
                "wait_for_model": true,
            }
        });

        let mut builder = self.http.post(self.endpoint()).json(&payload);
        if let Some(token) = self.api_token.as_deref() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|error| {
            EngineError::ProviderUnavailable(format!(
                "failed to reach Hugging Face at {}: {error}",
                self.base_url
            ))
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(EngineError::ProviderUnavailable(format!(
                    "model endpoint {} returned 404",
                    self.endpoint()
                )));
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(EngineError::ProviderUnavailable(format!(
                    "Hugging Face rejected credentials ({})",
                    response.status()
                )));
            }
            status if !status.is_success() => {
                let body = error_body(response).await;
                return Err(EngineError::GenerationFailed(format!(
                    "Hugging Face returned {status}: {body}"
                )));
            }
            _ => {}
        }

        let body: InferenceResponse = response.json().await.map_err(|error| {
            EngineError::InvalidResponse(format!("failed to decode inference response: {error}"))
        })?;

        match body {
            InferenceResponse::Error { error } => Err(EngineError::GenerationFailed(error)),
            InferenceResponse::Summaries(items) => {
                let summary = items
                    .into_iter()
                    .next()
                    .map(|item| item.summary_text.trim().to_string())
                    .unwrap_or_default();
                if summary.is_empty() {
                    Err(EngineError::EmptySummary)
                } else {
                    Ok(summary)
                }
            }
        }
    }
}
