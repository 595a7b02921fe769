use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct PipelineMetrics {
    documents_summarized: AtomicU64,
    documents_skipped: AtomicU64,
    chunks_summarized: AtomicU64,
    chunks_too_short: AtomicU64,
    chunks_failed: AtomicU64,
    syntheses_completed: AtomicU64,
    syntheses_failed: AtomicU64,
}

impl PipelineMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document that produced a summary.
    pub fn record_document_summarized(&self) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a document that was skipped.
    pub fn record_document_skipped(&self) {
        self.documents_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the chunk outcomes of one summarization pass.
    pub fn record_chunks(&self, summarized: u64, too_short: u64, failed: u64) {
        self.chunks_summarized
            .fetch_add(summarized, Ordering::Relaxed);
        self.chunks_too_short.fetch_add(too_short, Ordering::Relaxed);
        self.chunks_failed.fetch_add(failed, Ordering::Relaxed);
    }

    /// Record the terminal state of a synthesis batch.
    pub fn record_synthesis(&self, completed: bool) {
        let counter = if completed {
            &self.syntheses_completed
        } else {
            &self.syntheses_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            documents_skipped: self.documents_skipped.load(Ordering::Relaxed),
            chunks_summarized: self.chunks_summarized.load(Ordering::Relaxed),
            chunks_too_short: self.chunks_too_short.load(Ordering::Relaxed),
            chunks_failed: self.chunks_failed.load(Ordering::Relaxed),
            syntheses_completed: self.syntheses_completed.load(Ordering::Relaxed),
            syntheses_failed: self.syntheses_failed.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of pipeline counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Documents that produced a summary since startup.
    pub documents_summarized: u64,
    /// Documents skipped for lack of usable text.
    pub documents_skipped: u64,
    /// Chunks summarized successfully.
    pub chunks_summarized: u64,
    /// Chunks skipped for falling under the word threshold.
    pub chunks_too_short: u64,
    /// Chunks whose engine call failed.
    pub chunks_failed: u64,
    /// Synthesis batches that produced a final text.
    pub syntheses_completed: u64,
    /// Synthesis batches that ended without a final text.
    pub syntheses_failed: u64,
}
