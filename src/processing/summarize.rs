//! Concurrent chunk summarization and ordered aggregation.
//!
//! Every chunk is handed to exactly one engine call, with at most `concurrency` calls in flight.
//! Results land in a slot per chunk, so completion order never leaks into the output: the
//! aggregator emits summaries strictly by `chunk_index`. A failed or skipped chunk leaves its
//! slot absent and never disturbs its siblings.

use crate::summarization::{SummarizationEngine, SummarizationRequest, SummaryLength};
use futures_util::stream::{self, StreamExt};

use super::types::{Chunk, ChunkSummaries, ChunkSummary, ChunkingProfile};

#[derive(Debug, Clone)]
enum ChunkOutcome {
    Summarized(String),
    TooShort,
    Failed,
}

/// Summarizes the chunks of one text against the external engine.
///
/// The pool it drives lives only as long as a single [`ChunkSummarizer::summarize`] call.
pub struct ChunkSummarizer<'a> {
    engine: &'a dyn SummarizationEngine,
    min_words: usize,
    length: SummaryLength,
    concurrency: usize,
}

impl<'a> ChunkSummarizer<'a> {
    /// Build a summarizer for the given profile and worker bound.
    pub fn new(
        engine: &'a dyn SummarizationEngine,
        profile: &ChunkingProfile,
        concurrency: usize,
    ) -> Self {
        Self {
            engine,
            min_words: profile.min_words,
            length: profile.length,
            concurrency: concurrency.max(1),
        }
    }

    /// Summarize every chunk and return the present summaries in chunk order.
    pub async fn summarize(&self, chunks: &[Chunk]) -> ChunkSummaries {
        let mut slots: Vec<Option<ChunkOutcome>> = vec![None; chunks.len()];

        let pending: Vec<_> = chunks
            .iter()
            .enumerate()
            .map(|(slot, chunk)| async move { (slot, self.summarize_chunk(chunk).await) })
            .collect();
        let completed: Vec<(usize, ChunkOutcome)> = stream::iter(pending)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; each result goes back to its own slot.
        for (slot, outcome) in completed {
            slots[slot] = Some(outcome);
        }

        let mut result = ChunkSummaries::default();
        for (chunk, outcome) in chunks.iter().zip(slots) {
            match outcome {
                Some(ChunkOutcome::Summarized(text)) => result.summaries.push(ChunkSummary {
                    document_id: chunk.document_id.clone(),
                    chunk_index: chunk.index,
                    text: Some(text),
                }),
                Some(ChunkOutcome::TooShort) => result.too_short += 1,
                Some(ChunkOutcome::Failed) | None => result.failed += 1,
            }
        }
        result.summaries.sort_by_key(|summary| summary.chunk_index);
        result
    }

    async fn summarize_chunk(&self, chunk: &Chunk) -> ChunkOutcome {
        if chunk.word_count == 0 || chunk.word_count < self.min_words {
            tracing::warn!(
                document_id = %chunk.document_id,
                chunk_index = chunk.index,
                word_count = chunk.word_count,
                min_words = self.min_words,
                "Chunk too short; skipping"
            );
            return ChunkOutcome::TooShort;
        }

        let request = SummarizationRequest {
            text: chunk.text.clone(),
            length: self.length,
        };
        match self.engine.summarize(request).await {
            Ok(text) if text.trim().is_empty() => {
                tracing::warn!(
                    document_id = %chunk.document_id,
                    chunk_index = chunk.index,
                    "Engine returned a blank summary; leaving it out"
                );
                ChunkOutcome::Failed
            }
            Ok(text) => {
                tracing::debug!(
                    document_id = %chunk.document_id,
                    chunk_index = chunk.index,
                    "Chunk summarized"
                );
                ChunkOutcome::Summarized(text.trim().to_string())
            }
            Err(error) => {
                tracing::warn!(
                    document_id = %chunk.document_id,
                    chunk_index = chunk.index,
                    error = %error,
                    "Chunk summarization failed; leaving it out"
                );
                ChunkOutcome::Failed
            }
        }
    }
}

/// Join present chunk summaries with single spaces, ordered by `chunk_index`.
///
/// Arrival order is irrelevant; absent entries are dropped rather than padded. Returns an empty
/// string when nothing is present.
pub fn aggregate(summaries: &[ChunkSummary]) -> String {
    let mut present: Vec<(usize, &str)> = summaries
        .iter()
        .filter_map(|summary| {
            summary
                .text
                .as_deref()
                .map(|text| (summary.chunk_index, text))
        })
        .collect();
    present.sort_by_key(|(index, _)| *index);
    present
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join(" ")
}
