//! HTTP surface for Paper Synth.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /synthesize` – Summarize each document of a batch and synthesize the survivors into one
//!   cross-document summary. Always answers with a structured report (`completed`,
//!   `no_valid_summaries`, or `final_synthesis_failed`).
//! - `POST /summarize` – Summarize a single text directly using character windows.
//! - `GET /metrics` – Observe pipeline counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Text extraction (PDF, URL, DOI) happens upstream; this surface accepts already-extracted text.

use crate::processing::{BatchError, SynthesisApi, SynthesisReport, prepare_documents};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the pipeline.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: SynthesisApi + 'static,
{
    Router::new()
        .route("/synthesize", post(synthesize_documents::<S>))
        .route("/summarize", post(summarize_text::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// One document of a `POST /synthesize` request.
#[derive(Deserialize)]
struct DocumentInput {
    /// Optional identifier (defaults to `document-<position>`).
    #[serde(default)]
    id: Option<String>,
    /// Extracted document text.
    text: String,
}

/// Request body for the `POST /synthesize` endpoint.
#[derive(Deserialize)]
struct SynthesizeRequest {
    documents: Vec<DocumentInput>,
}

/// Summarize a batch of documents and synthesize them.
async fn synthesize_documents<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Json<SynthesisReport>, AppError>
where
    S: SynthesisApi,
{
    let documents = prepare_documents(
        request
            .documents
            .into_iter()
            .map(|document| (document.id, document.text)),
    )?;
    let count = documents.len();
    let result = service.synthesize(documents).await;
    let report = SynthesisReport::from(&result);
    tracing::info!(
        documents = count,
        status = ?report.status,
        elapsed_seconds = report.elapsed_seconds,
        "Synthesis request completed"
    );
    Ok(Json(report))
}

/// Request body for the `POST /summarize` endpoint.
#[derive(Deserialize)]
struct SummarizeRequest {
    text: String,
}

/// Success response for the `POST /summarize` endpoint.
#[derive(Serialize)]
struct SummarizeResponse {
    /// Ordered join of the chunk summaries.
    summary: String,
    /// Number of character windows the text was cut into.
    chunk_count: usize,
    /// Number of windows that produced a summary.
    summarized: usize,
}

/// Summarize one text directly.
async fn summarize_text<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: SynthesisApi,
{
    if request.text.trim().is_empty() {
        return Err(AppError::InvalidRequest("`text` must not be empty".into()));
    }
    let summary = service.summarize_text(request.text).await;
    Ok(Json(SummarizeResponse {
        summary: summary.text,
        chunk_count: summary.chunk_count,
        summarized: summary.summarized,
    }))
}

/// Return the current pipeline counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<crate::metrics::MetricsSnapshot>
where
    S: SynthesisApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "synthesize",
                method: "POST",
                path: "/synthesize",
                description: "Summarize each document, then synthesize shared and unique content across them. Response reports per-document status, the combined input, and the final synthesis or failure reason.",
                request_example: Some(json!({
                    "documents": [
                        { "id": "attention.pdf", "text": "Extracted paper text" },
                        { "text": "Another paper" }
                    ]
                })),
            },
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Summarize a single text in character windows. Response returns { \"summary\": string, \"chunk_count\": number, \"summarized\": number }.",
                request_example: Some(json!({ "text": "Long text to condense" })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return document, chunk, and synthesis counters.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    InvalidRequest(String),
}

impl From<BatchError> for AppError {
    fn from(error: BatchError) -> Self {
        Self::InvalidRequest(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{create_router, get_commands};
    use crate::metrics::MetricsSnapshot;
    use crate::processing::{
        Document, DocumentOutcome, DocumentSummary, SkipReason, SynthesisApi, SynthesisFailure,
        SynthesisResult, TextSummary,
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    #[tokio::test]
    async fn commands_catalog_exposes_synthesize_endpoint() {
        let response = get_commands().await;
        let commands = response.0.commands;
        let synthesize = commands
            .iter()
            .find(|cmd| cmd.name == "synthesize")
            .expect("synthesize command present");

        assert_eq!(synthesize.method, "POST");
        assert_eq!(synthesize.path, "/synthesize");
        assert!(synthesize.description.to_lowercase().contains("synthesize"));
        assert!(commands.len() >= 3);
    }

    #[tokio::test]
    async fn synthesize_route_assigns_ids_and_reports_outcome() {
        let service = Arc::new(StubSynthesisService::new(Ok("Shared themes.".into())));
        let app = create_router(service.clone());

        let payload = json!({
            "documents": [
                { "id": " a.pdf ", "text": "alpha" },
                { "text": "beta" }
            ]
        });

        let (status, body) = post_json(app, "/synthesize", payload).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "completed");
        assert_eq!(body["final_text"], "Shared themes.");
        assert_eq!(body["per_document"][0]["document_id"], "a.pdf");
        assert_eq!(body["per_document"][1]["document_id"], "document-2");
        assert_eq!(body["per_document"][1]["status"], "skipped");
        assert_eq!(body["per_document"][1]["reason"], "all chunks unsummarizable");

        let calls = service.recorded_batches().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            vec![Document::new("a.pdf", "alpha"), Document::new("document-2", "beta")]
        );
    }

    #[tokio::test]
    async fn synthesize_route_reports_exhausted_batch_with_ok_status() {
        let service = Arc::new(StubSynthesisService::new(Err(
            SynthesisFailure::NoValidSummaries,
        )));
        let app = create_router(service);

        let (status, body) = post_json(
            app,
            "/synthesize",
            json!({ "documents": [{ "id": "x", "text": "tiny" }] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "no_valid_summaries");
        assert_eq!(body["failure_reason"], "No valid summaries were generated.");
    }

    #[tokio::test]
    async fn synthesize_route_rejects_empty_and_duplicate_batches() {
        let service = Arc::new(StubSynthesisService::new(Ok(String::new())));

        let (status, _) = post_json(
            create_router(service.clone()),
            "/synthesize",
            json!({ "documents": [] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post_json(
            create_router(service.clone()),
            "/synthesize",
            json!({ "documents": [{ "id": "a", "text": "1" }, { "id": "a ", "text": "2" }] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|e| e.contains("`a`")));

        assert!(service.recorded_batches().await.is_empty());
    }

    #[tokio::test]
    async fn summarize_route_returns_text_summary() {
        let service = Arc::new(StubSynthesisService::new(Ok(String::new())));
        let app = create_router(service);

        let (status, body) =
            post_json(app, "/summarize", json!({ "text": "Some long text" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "condensed");
        assert_eq!(body["chunk_count"], 2);
        assert_eq!(body["summarized"], 1);
    }

    #[tokio::test]
    async fn metrics_route_serializes_snapshot() {
        let service = Arc::new(StubSynthesisService::new(Ok(String::new())));
        let app = create_router(service);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/metrics")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["documents_summarized"], 4);
        assert_eq!(json["syntheses_failed"], 0);
    }

    async fn post_json(app: axum::Router, uri: &str, payload: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    /// Marks the first document summarized and every other one skipped.
    struct StubSynthesisService {
        batches: Arc<Mutex<Vec<Vec<Document>>>>,
        outcome: Result<String, SynthesisFailure>,
    }

    impl StubSynthesisService {
        fn new(outcome: Result<String, SynthesisFailure>) -> Self {
            Self {
                batches: Arc::new(Mutex::new(Vec::new())),
                outcome,
            }
        }

        async fn recorded_batches(&self) -> Vec<Vec<Document>> {
            self.batches.lock().await.clone()
        }
    }

    #[async_trait]
    impl SynthesisApi for StubSynthesisService {
        async fn synthesize(&self, documents: Vec<Document>) -> SynthesisResult {
            let per_document = documents
                .iter()
                .enumerate()
                .map(|(position, document)| {
                    if position == 0 {
                        DocumentOutcome::Summarized(DocumentSummary {
                            document_id: document.id.clone(),
                            text: "summary".into(),
                        })
                    } else {
                        DocumentOutcome::Skipped {
                            document_id: document.id.clone(),
                            reason: SkipReason::AllChunksUnsummarizable,
                        }
                    }
                })
                .collect();
            self.batches.lock().await.push(documents);
            SynthesisResult {
                per_document,
                combined_input: None,
                outcome: self.outcome.clone(),
                elapsed: Duration::from_millis(5),
            }
        }

        async fn summarize_text(&self, _text: String) -> TextSummary {
            TextSummary {
                text: "condensed".into(),
                chunk_count: 2,
                summarized: 1,
            }
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                documents_summarized: 4,
                ..MetricsSnapshot::default()
            }
        }
    }
}
