//! Summarization pipeline: cleaning, chunking, concurrent chunk summaries, and synthesis.

pub mod chunking;
mod document;
pub mod format;
pub mod sanitize;
mod service;
mod summarize;
mod synthesis;
#[cfg(test)]
mod test_support;
pub mod types;

pub use chunking::{ChunkUnit, chunk_text};
pub use document::{DocumentSummarizer, summarize_text};
pub use format::{SynthesisReport, render_report};
pub use sanitize::{clean_text, prepare_documents};
pub use service::{ProcessingService, SynthesisApi};
pub use summarize::{ChunkSummarizer, aggregate};
pub use synthesis::{CrossDocumentSynthesizer, truncate_chars};
pub use types::{
    BatchError, Chunk, ChunkSummaries, ChunkSummary, ChunkingProfile, Document, DocumentOutcome,
    DocumentSummary, PipelineConfig, SkipReason, SynthesisFailure, SynthesisResult, TextSummary,
};
