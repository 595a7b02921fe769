//! Cross-document synthesis: summarize each document, then summarize the summaries.
//!
//! Documents are processed one after another (each one fanning out over its own chunk pool), so
//! at most one pool's worth of engine calls is in flight per batch. A skipped document is
//! recorded and the batch moves on. Surviving summaries are labelled, joined in input order,
//! hard-truncated to the configured character ceiling, and wrapped in a fixed instruction for a
//! single final engine call.

use crate::metrics::PipelineMetrics;
use crate::summarization::{SummarizationEngine, SummarizationRequest};
use std::time::Instant;

use super::{
    document::DocumentSummarizer,
    types::{
        Document, DocumentOutcome, DocumentSummary, PipelineConfig, SynthesisFailure,
        SynthesisResult,
    },
};

const SYNTHESIS_INSTRUCTION: &str = "The following are summaries of separate research papers. \
Synthesize their key insights, compare the themes they share, highlight the unique contribution \
of each paper, and give a cohesive overall understanding of the set:\n\n";

/// Drives [`DocumentSummarizer`] over a batch and performs the final reduction.
pub struct CrossDocumentSynthesizer<'a> {
    engine: &'a dyn SummarizationEngine,
    metrics: &'a PipelineMetrics,
    config: PipelineConfig,
}

impl<'a> CrossDocumentSynthesizer<'a> {
    /// Build a synthesizer over the injected engine.
    pub fn new(
        engine: &'a dyn SummarizationEngine,
        metrics: &'a PipelineMetrics,
        config: PipelineConfig,
    ) -> Self {
        Self {
            engine,
            metrics,
            config,
        }
    }

    /// Synthesize a batch of documents into one cross-document summary.
    ///
    /// Always returns a structured result; failures are reported through
    /// [`SynthesisResult::outcome`] alongside whatever per-document work completed.
    pub async fn synthesize(&self, documents: &[Document]) -> SynthesisResult {
        let started = Instant::now();
        let total = documents.len();
        tracing::info!(documents = total, "Starting cross-document synthesis");

        let summarizer = DocumentSummarizer::new(self.engine, self.metrics, &self.config);
        let mut per_document = Vec::with_capacity(total);
        for (position, document) in documents.iter().enumerate() {
            tracing::info!(
                document_id = %document.id,
                position = position + 1,
                total,
                "Processing document"
            );
            per_document.push(summarizer.summarize_document(document).await);
        }

        let blocks: Vec<String> = per_document
            .iter()
            .filter_map(DocumentOutcome::summary)
            .map(format_block)
            .collect();

        if blocks.is_empty() {
            self.metrics.record_synthesis(false);
            tracing::warn!(documents = total, "No valid summaries were generated");
            return SynthesisResult {
                per_document,
                combined_input: None,
                outcome: Err(SynthesisFailure::NoValidSummaries),
                elapsed: started.elapsed(),
            };
        }

        let joined = blocks.join("\n\n");
        let combined = truncate_chars(&joined, self.config.synthesis_input_limit.get()).to_string();
        if combined.len() < joined.len() {
            tracing::debug!(
                limit = self.config.synthesis_input_limit.get(),
                original_chars = joined.chars().count(),
                "Truncated combined synthesis input"
            );
        }

        let request = SummarizationRequest {
            text: build_synthesis_prompt(&combined),
            length: self.config.synthesis_length,
        };
        let outcome = match self.engine.summarize(request).await {
            Ok(text) => {
                self.metrics.record_synthesis(true);
                Ok(text)
            }
            Err(error) => {
                self.metrics.record_synthesis(false);
                tracing::error!(error = %error, "Final synthesis failed");
                Err(SynthesisFailure::FinalSynthesisFailed(error))
            }
        };

        let elapsed = started.elapsed();
        tracing::info!(
            summarized = blocks.len(),
            skipped = total - blocks.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            succeeded = outcome.is_ok(),
            "Cross-document synthesis finished"
        );

        SynthesisResult {
            per_document,
            combined_input: Some(combined),
            outcome,
            elapsed,
        }
    }
}

/// Label a document summary for inclusion in the combined input.
pub fn format_block(summary: &DocumentSummary) -> String {
    format!("Summary of {}:\n{}", summary.document_id, summary.text)
}

/// Wrap the combined summaries in the fixed synthesis instruction.
pub fn build_synthesis_prompt(combined: &str) -> String {
    let mut prompt = String::with_capacity(SYNTHESIS_INSTRUCTION.len() + combined.len());
    prompt.push_str(SYNTHESIS_INSTRUCTION);
    prompt.push_str(combined);
    prompt
}

/// Return the first `limit` characters of `text`, cutting on a character boundary.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}
