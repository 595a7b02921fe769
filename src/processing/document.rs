//! Per-document summarization: clean, chunk, summarize concurrently, aggregate.

use crate::metrics::PipelineMetrics;
use crate::summarization::SummarizationEngine;

use super::{
    chunking::chunk_text,
    summarize::{ChunkSummarizer, aggregate},
    types::{
        ChunkingProfile, Document, DocumentOutcome, DocumentSummary, PipelineConfig, SkipReason,
        TextSummary,
    },
};

/// Identifier attached to chunks of a direct text summarization.
const TEXT_DOCUMENT_ID: &str = "text";

/// Reduces one document to a bounded summary.
///
/// Engine failures never escape: they degrade to a partial aggregation or a
/// [`DocumentOutcome::Skipped`].
pub struct DocumentSummarizer<'a> {
    engine: &'a dyn SummarizationEngine,
    metrics: &'a PipelineMetrics,
    profile: ChunkingProfile,
    concurrency: usize,
}

impl<'a> DocumentSummarizer<'a> {
    /// Build a summarizer using the document profile of `config`.
    pub fn new(
        engine: &'a dyn SummarizationEngine,
        metrics: &'a PipelineMetrics,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            engine,
            metrics,
            profile: config.document,
            concurrency: config.concurrency.get(),
        }
    }

    /// Summarize one document, or explain why it was skipped.
    pub async fn summarize_document(&self, document: &Document) -> DocumentOutcome {
        let cleaned = document.cleaned_text();
        if cleaned.is_empty() {
            return self.skip(document, SkipReason::NoExtractableText);
        }

        let chunks = chunk_text(&document.id, &cleaned, self.profile.unit, self.profile.size);
        tracing::debug!(
            document_id = %document.id,
            chunks = chunks.len(),
            unit = %self.profile.unit,
            chunk_size = self.profile.size.get(),
            "Chunked document"
        );

        let results = ChunkSummarizer::new(self.engine, &self.profile, self.concurrency)
            .summarize(&chunks)
            .await;
        self.metrics.record_chunks(
            results.summaries.len() as u64,
            results.too_short as u64,
            results.failed as u64,
        );

        let text = aggregate(&results.summaries);
        if text.is_empty() {
            return self.skip(document, SkipReason::AllChunksUnsummarizable);
        }

        self.metrics.record_document_summarized();
        tracing::info!(
            document_id = %document.id,
            chunks = chunks.len(),
            summarized = results.summaries.len(),
            too_short = results.too_short,
            failed = results.failed,
            "Document summarized"
        );
        DocumentOutcome::Summarized(DocumentSummary {
            document_id: document.id.clone(),
            text,
        })
    }

    fn skip(&self, document: &Document, reason: SkipReason) -> DocumentOutcome {
        self.metrics.record_document_skipped();
        tracing::warn!(document_id = %document.id, %reason, "Skipping document");
        DocumentOutcome::Skipped {
            document_id: document.id.clone(),
            reason,
        }
    }
}

/// Summarize a single text directly, without cleaning, using the `text` profile.
pub async fn summarize_text(
    engine: &dyn SummarizationEngine,
    metrics: &PipelineMetrics,
    config: &PipelineConfig,
    text: &str,
) -> TextSummary {
    let chunks = chunk_text(TEXT_DOCUMENT_ID, text, config.text.unit, config.text.size);
    let results = ChunkSummarizer::new(engine, &config.text, config.concurrency.get())
        .summarize(&chunks)
        .await;
    metrics.record_chunks(
        results.summaries.len() as u64,
        results.too_short as u64,
        results.failed as u64,
    );
    tracing::info!(
        chunks = chunks.len(),
        summarized = results.summaries.len(),
        failed = results.failed,
        "Text summarized"
    );

    TextSummary {
        text: aggregate(&results.summaries),
        chunk_count: chunks.len(),
        summarized: results.summaries.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::test_support::{ScriptedEngine, words};
    use crate::summarization::{EngineError, SummaryLength};

    fn document(id: &str, raw_text: String) -> Document {
        Document::new(id, raw_text)
    }

    #[tokio::test]
    async fn fragment_lines_skip_with_no_extractable_text() {
        let engine = ScriptedEngine::echo_prefix();
        let metrics = PipelineMetrics::new();
        let summarizer = DocumentSummarizer::new(&engine, &metrics, &PipelineConfig::default());

        let outcome = summarizer
            .summarize_document(&document("a", "short\nlines\nonly".into()))
            .await;

        assert_eq!(
            outcome,
            DocumentOutcome::Skipped {
                document_id: "a".into(),
                reason: SkipReason::NoExtractableText,
            }
        );
        assert_eq!(engine.call_count(), 0);
        assert_eq!(metrics.snapshot().documents_skipped, 1);
    }

    #[tokio::test]
    async fn short_document_skips_with_all_chunks_unsummarizable() {
        let engine = ScriptedEngine::echo_prefix();
        let metrics = PipelineMetrics::new();
        let summarizer = DocumentSummarizer::new(&engine, &metrics, &PipelineConfig::default());

        let outcome = summarizer
            .summarize_document(&document("b", words("b", 30)))
            .await;

        assert_eq!(
            outcome,
            DocumentOutcome::Skipped {
                document_id: "b".into(),
                reason: SkipReason::AllChunksUnsummarizable,
            }
        );
        assert_eq!(metrics.snapshot().chunks_too_short, 1);
    }

    #[tokio::test]
    async fn failing_engine_degrades_to_skip() {
        let engine = ScriptedEngine::new(|_| Err(EngineError::ProviderUnavailable("down".into())));
        let metrics = PipelineMetrics::new();
        let summarizer = DocumentSummarizer::new(&engine, &metrics, &PipelineConfig::default());

        let outcome = summarizer
            .summarize_document(&document("c", words("c", 120)))
            .await;

        assert!(matches!(
            outcome,
            DocumentOutcome::Skipped {
                reason: SkipReason::AllChunksUnsummarizable,
                ..
            }
        ));
        assert_eq!(metrics.snapshot().chunks_failed, 1);
    }

    #[tokio::test]
    async fn summaries_join_in_chunk_order() {
        let engine = ScriptedEngine::echo_prefix();
        let metrics = PipelineMetrics::new();
        let summarizer = DocumentSummarizer::new(&engine, &metrics, &PipelineConfig::default());
        // 200 + 200 + 60 words: three chunks, all above the threshold.
        let raw = format!(
            "{}\n{}\n{}",
            words("x", 200),
            words("y", 200),
            words("z", 60)
        );

        let outcome = summarizer.summarize_document(&document("d", raw)).await;

        let summary = outcome.summary().expect("summarized");
        assert_eq!(summary.text, "x-0 y-0 z-0");
        assert_eq!(engine.call_count(), 3);
        assert!(
            engine
                .lengths()
                .iter()
                .all(|length| *length == SummaryLength::new(150, 30))
        );
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_summarized, 1);
        assert_eq!(snapshot.chunks_summarized, 3);
    }

    #[tokio::test]
    async fn blank_chunk_summary_does_not_leak_into_document_summary() {
        let engine = ScriptedEngine::new(|text| {
            if text.starts_with("f-0 ") {
                Ok(String::new())
            } else {
                Ok("s".into())
            }
        });
        let metrics = PipelineMetrics::new();
        let summarizer = DocumentSummarizer::new(&engine, &metrics, &PipelineConfig::default());

        let outcome = summarizer
            .summarize_document(&document("f", words("f", 260)))
            .await;

        assert_eq!(outcome.summary().map(|s| s.text.as_str()), Some("s"));
        assert_eq!(metrics.snapshot().chunks_failed, 1);
    }

    #[tokio::test]
    async fn blank_summaries_everywhere_skip_the_document() {
        let engine = ScriptedEngine::new(|_| Ok("   ".into()));
        let metrics = PipelineMetrics::new();
        let summarizer = DocumentSummarizer::new(&engine, &metrics, &PipelineConfig::default());

        let outcome = summarizer
            .summarize_document(&document("g", words("g", 120)))
            .await;

        assert_eq!(
            outcome,
            DocumentOutcome::Skipped {
                document_id: "g".into(),
                reason: SkipReason::AllChunksUnsummarizable,
            }
        );
        assert_eq!(metrics.snapshot().documents_summarized, 0);
    }

    #[tokio::test]
    async fn character_unit_profile_summarizes_documents() {
        let engine = ScriptedEngine::echo_prefix();
        let metrics = PipelineMetrics::new();
        let mut config = PipelineConfig::default();
        config.document = config.text;

        let outcome = DocumentSummarizer::new(&engine, &metrics, &config)
            .summarize_document(&document("h", words("h", 2000)))
            .await;

        assert!(outcome.summary().is_some());
        assert!(engine.call_count() > 1);
    }

    #[tokio::test]
    async fn trailing_short_chunk_is_left_out() {
        let engine = ScriptedEngine::echo_prefix();
        let metrics = PipelineMetrics::new();
        let summarizer = DocumentSummarizer::new(&engine, &metrics, &PipelineConfig::default());

        let outcome = summarizer
            .summarize_document(&document("e", words("e", 210)))
            .await;

        assert_eq!(outcome.summary().map(|s| s.text.as_str()), Some("e-0"));
        assert_eq!(engine.call_count(), 1);
    }

    #[tokio::test]
    async fn summarize_text_uses_character_windows() {
        let engine = ScriptedEngine::echo_prefix();
        let metrics = PipelineMetrics::new();
        let config = PipelineConfig::default();
        let text = "a".repeat(2500);

        let summary = summarize_text(&engine, &metrics, &config, &text).await;

        assert_eq!(summary.chunk_count, 3);
        assert_eq!(summary.summarized, 3);
        let sizes: Vec<usize> = engine.texts().iter().map(|t| t.chars().count()).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 2500);
        assert!(sizes.iter().all(|size| *size <= 1000));
        assert!(
            engine
                .lengths()
                .iter()
                .all(|length| *length == SummaryLength::new(150, 40))
        );
    }

    #[tokio::test]
    async fn summarize_text_of_empty_input_is_empty() {
        let engine = ScriptedEngine::echo_prefix();
        let metrics = PipelineMetrics::new();

        let summary = summarize_text(&engine, &metrics, &PipelineConfig::default(), "").await;

        assert_eq!(summary, TextSummary::default());
        assert_eq!(engine.call_count(), 0);
    }
}
