//! Processing service owning the engine handle, pipeline settings, and metrics.

use crate::{
    metrics::{MetricsSnapshot, PipelineMetrics},
    processing::{
        document::summarize_text,
        synthesis::CrossDocumentSynthesizer,
        types::{Document, PipelineConfig, SynthesisResult, TextSummary},
    },
    summarization::SummarizationEngine,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Long-lived entry point to the summarization pipeline.
///
/// The service owns the shared engine handle and metrics registry so that both the HTTP surface
/// and the command-line driver reuse the same components. Construct it once near process start
/// and share it through an `Arc`. Each call builds its own per-document pools; nothing is shared
/// between concurrent calls except the engine and the counters.
pub struct ProcessingService {
    engine: Arc<dyn SummarizationEngine>,
    config: PipelineConfig,
    metrics: Arc<PipelineMetrics>,
}

/// Abstraction over the pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait SynthesisApi: Send + Sync {
    /// Summarize each document and synthesize the survivors.
    async fn synthesize(&self, documents: Vec<Document>) -> SynthesisResult;

    /// Summarize one text directly.
    async fn summarize_text(&self, text: String) -> TextSummary;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl ProcessingService {
    /// Build a service around an engine.
    pub fn new(engine: Arc<dyn SummarizationEngine>, config: PipelineConfig) -> Self {
        tracing::debug!(
            unit = %config.document.unit,
            chunk_size = config.document.size.get(),
            min_words = config.document.min_words,
            concurrency = config.concurrency.get(),
            input_limit = config.synthesis_input_limit.get(),
            "Pipeline configured"
        );
        Self {
            engine,
            config,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Pipeline settings in effect.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Summarize each document and synthesize the survivors.
    pub async fn synthesize(&self, documents: &[Document]) -> SynthesisResult {
        CrossDocumentSynthesizer::new(self.engine.as_ref(), &self.metrics, self.config)
            .synthesize(documents)
            .await
    }

    /// Summarize one text directly using the character-window profile.
    pub async fn summarize_text(&self, text: &str) -> TextSummary {
        summarize_text(self.engine.as_ref(), &self.metrics, &self.config, text).await
    }

    /// Return the current pipeline metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl SynthesisApi for ProcessingService {
    async fn synthesize(&self, documents: Vec<Document>) -> SynthesisResult {
        ProcessingService::synthesize(self, &documents).await
    }

    async fn summarize_text(&self, text: String) -> TextSummary {
        ProcessingService::summarize_text(self, &text).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        ProcessingService::metrics_snapshot(self)
    }
}
