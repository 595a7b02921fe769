//! Core data types and error definitions for the summarization pipeline.

use crate::summarization::{EngineError, SummaryLength};
use std::num::NonZeroUsize;
use std::time::Duration;
use thiserror::Error;

use super::{chunking::ChunkUnit, sanitize::clean_text};

const fn non_zero(value: usize) -> NonZeroUsize {
    match NonZeroUsize::new(value) {
        Some(value) => value,
        None => panic!("pipeline defaults must be non-zero"),
    }
}

/// Default document window, in words.
pub const DEFAULT_DOCUMENT_CHUNK_WORDS: NonZeroUsize = non_zero(200);
/// Default window for direct text and character-unit documents, in characters.
pub const DEFAULT_TEXT_CHUNK_CHARS: NonZeroUsize = non_zero(1000);
/// Default minimum word count for a word-unit document chunk.
pub const DEFAULT_MIN_CHUNK_WORDS: usize = 50;

/// Errors raised while assembling a batch of documents from caller input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchError {
    /// The batch contained no documents.
    #[error("document batch is empty")]
    Empty,
    /// Two documents resolved to the same identifier.
    #[error("document id `{0}` appears more than once")]
    DuplicateId(String),
}

/// How one kind of text is cut into chunks and condensed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingProfile {
    /// Unit in which `size` is measured.
    pub unit: ChunkUnit,
    /// Maximum number of units per chunk.
    pub size: NonZeroUsize,
    /// Chunks with fewer words are skipped instead of summarized.
    pub min_words: usize,
    /// Length bounds for each chunk summary.
    pub length: SummaryLength,
}

/// Settings injected into the pipeline at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Profile used when summarizing documents of a synthesis batch.
    pub document: ChunkingProfile,
    /// Profile used for direct single-text summarization.
    pub text: ChunkingProfile,
    /// Maximum number of in-flight engine calls per document.
    pub concurrency: NonZeroUsize,
    /// Character ceiling applied to the combined input of the final synthesis call.
    pub synthesis_input_limit: NonZeroUsize,
    /// Length bounds for the final synthesis call.
    pub synthesis_length: SummaryLength,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            document: ChunkingProfile {
                unit: ChunkUnit::Words,
                size: DEFAULT_DOCUMENT_CHUNK_WORDS,
                min_words: DEFAULT_MIN_CHUNK_WORDS,
                length: SummaryLength::new(150, 30),
            },
            text: ChunkingProfile {
                unit: ChunkUnit::Characters,
                size: DEFAULT_TEXT_CHUNK_CHARS,
                min_words: 0,
                length: SummaryLength::new(150, 40),
            },
            concurrency: non_zero(6),
            synthesis_input_limit: non_zero(3000),
            synthesis_length: SummaryLength::new(250, 100),
        }
    }
}

/// A source document handed to the pipeline by the ingestion layer.
///
/// The cleaned text is derived on demand by [`Document::cleaned_text`] rather than stored, so a
/// document stays a plain value that callers can build and compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Caller-assigned identifier, unique within a batch.
    pub id: String,
    /// Raw extracted text, possibly containing extraction artifacts.
    pub raw_text: String,
}

impl Document {
    /// Create a document from an identifier and raw text.
    pub fn new(id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw_text: raw_text.into(),
        }
    }

    /// Summarizable prose derived from `raw_text`; empty when nothing survives cleaning.
    pub fn cleaned_text(&self) -> String {
        clean_text(&self.raw_text)
    }
}

/// A bounded slice of cleaned text processed as one summarization unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Identifier of the owning document.
    pub document_id: String,
    /// Zero-based position of the chunk; the only ordering key downstream.
    pub index: usize,
    /// Number of whitespace-separated words in `text`.
    pub word_count: usize,
    /// Chunk contents.
    pub text: String,
}

/// Summary produced for one chunk; `text` is `None` when the chunk was skipped or failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    /// Identifier of the owning document.
    pub document_id: String,
    /// Index of the chunk this summary was produced from.
    pub chunk_index: usize,
    /// Summary text, absent when nothing usable was produced.
    pub text: Option<String>,
}

/// Result of summarizing every chunk of one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSummaries {
    /// Present summaries, ordered by `chunk_index`.
    pub summaries: Vec<ChunkSummary>,
    /// Chunks skipped because they were below the word threshold.
    pub too_short: usize,
    /// Chunks whose engine call failed.
    pub failed: usize,
}

/// Ordered join of a document's chunk summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    /// Identifier of the summarized document.
    pub document_id: String,
    /// Space-joined chunk summaries in chunk order.
    pub text: String,
}

/// Why a document contributed nothing to a synthesis.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SkipReason {
    /// Cleaning removed every line.
    #[error("no extractable text")]
    NoExtractableText,
    /// Every chunk was too short or failed.
    #[error("all chunks unsummarizable")]
    AllChunksUnsummarizable,
}

/// Outcome of summarizing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The document produced a summary.
    Summarized(DocumentSummary),
    /// The document was excluded, with the reason.
    Skipped {
        /// Identifier of the skipped document.
        document_id: String,
        /// Policy decision that excluded it.
        reason: SkipReason,
    },
}

impl DocumentOutcome {
    /// Identifier of the document this outcome belongs to.
    pub fn document_id(&self) -> &str {
        match self {
            Self::Summarized(summary) => &summary.document_id,
            Self::Skipped { document_id, .. } => document_id,
        }
    }

    /// Borrow the summary when the document was summarized.
    pub fn summary(&self) -> Option<&DocumentSummary> {
        match self {
            Self::Summarized(summary) => Some(summary),
            Self::Skipped { .. } => None,
        }
    }
}

/// Terminal failures of a synthesis batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SynthesisFailure {
    /// No document produced a summary, so there was nothing to synthesize.
    #[error("No valid summaries were generated.")]
    NoValidSummaries,
    /// Document summaries exist but the final engine call failed.
    #[error("Final synthesis failed: {0}")]
    FinalSynthesisFailed(#[source] EngineError),
}

/// Structured outcome of a cross-document synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// One entry per input document, in input order.
    pub per_document: Vec<DocumentOutcome>,
    /// Truncated combined input sent to the final call; `None` when nothing survived.
    pub combined_input: Option<String>,
    /// Final synthesis text or the failure that prevented it.
    pub outcome: Result<String, SynthesisFailure>,
    /// Wall-clock time from batch start to completion.
    pub elapsed: Duration,
}

impl SynthesisResult {
    /// Summaries of the documents that survived, in input order.
    pub fn document_summaries(&self) -> impl Iterator<Item = &DocumentSummary> {
        self.per_document.iter().filter_map(DocumentOutcome::summary)
    }

    /// Documents that were skipped, with their reasons.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, SkipReason)> {
        self.per_document.iter().filter_map(|outcome| match outcome {
            DocumentOutcome::Skipped {
                document_id,
                reason,
            } => Some((document_id.as_str(), *reason)),
            DocumentOutcome::Summarized(_) => None,
        })
    }
}

/// Result of direct single-text summarization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSummary {
    /// Ordered join of the chunk summaries; empty when nothing was summarized.
    pub text: String,
    /// Number of chunks the text was cut into.
    pub chunk_count: usize,
    /// Number of chunks that produced a summary.
    pub summarized: usize,
}
