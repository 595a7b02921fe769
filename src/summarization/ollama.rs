use super::{EngineError, SummarizationEngine, SummarizationRequest, error_body};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

/// Engine backed by a local Ollama runtime (`/api/generate`).
pub struct OllamaEngine {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaEngine {
    /// Create an engine that posts to `base_url` using `model`.
    pub fn new(http: Client, base_url: String, model: String) -> Self {
        Self {
            http,
            base_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

fn build_prompt(request: &SummarizationRequest) -> String {
    format!(
        "System: You condense research text into a faithful, neutral summary. Do not speculate. \
         Write between {min} and {max} words as a single paragraph.\n\n{text}",
        min = request.length.min_length,
        max = request.length.max_length,
        text = request.text,
    )
}

#[async_trait]
impl SummarizationEngine for OllamaEngine {
    async fn summarize(&self, request: SummarizationRequest) -> Result<String, EngineError> {
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(&request),
            "stream": false,
            "options": {
                "temperature": 0.1,
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                EngineError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(EngineError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = error_body(response).await;
            return Err(EngineError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            EngineError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(EngineError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        let summary = body.response.trim();
        if summary.is_empty() {
            return Err(EngineError::EmptySummary);
        }
        Ok(summary.to_string())
    }
}
