//! Formatting helpers shared by the HTTP surface and the command-line driver.

use serde::Serialize;
use std::fmt::Write as _;

use super::{
    synthesis::format_block,
    types::{DocumentOutcome, SynthesisFailure, SynthesisResult},
};

/// Terminal state of a synthesis, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisStatus {
    /// A final synthesis was produced.
    Completed,
    /// No document yielded a summary.
    NoValidSummaries,
    /// Document summaries exist but the final call failed.
    FinalSynthesisFailed,
}

/// Whether a document contributed to the synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// The document produced a summary.
    Summarized,
    /// The document was excluded.
    Skipped,
}

/// Per-document entry of a [`SynthesisReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// Identifier of the document.
    pub document_id: String,
    /// Whether the document was summarized or skipped.
    pub status: DocumentStatus,
    /// Skip reason, present only for skipped documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Document summary, present only for summarized documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Serializable view of a [`SynthesisResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisReport {
    /// Terminal state of the batch.
    pub status: SynthesisStatus,
    /// One entry per input document, in input order.
    pub per_document: Vec<DocumentReport>,
    /// Truncated input sent to the final call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_input: Option<String>,
    /// Final synthesis text on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_text: Option<String>,
    /// Human-readable failure description otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Wall-clock duration of the batch, rounded to hundredths of a second.
    pub elapsed_seconds: f64,
}

impl From<&SynthesisResult> for SynthesisReport {
    fn from(result: &SynthesisResult) -> Self {
        let per_document = result
            .per_document
            .iter()
            .map(|outcome| match outcome {
                DocumentOutcome::Summarized(summary) => DocumentReport {
                    document_id: summary.document_id.clone(),
                    status: DocumentStatus::Summarized,
                    reason: None,
                    text: Some(summary.text.clone()),
                },
                DocumentOutcome::Skipped {
                    document_id,
                    reason,
                } => DocumentReport {
                    document_id: document_id.clone(),
                    status: DocumentStatus::Skipped,
                    reason: Some(reason.to_string()),
                    text: None,
                },
            })
            .collect();

        let (status, final_text, failure_reason) = match &result.outcome {
            Ok(text) => (SynthesisStatus::Completed, Some(text.clone()), None),
            Err(failure @ SynthesisFailure::NoValidSummaries) => (
                SynthesisStatus::NoValidSummaries,
                None,
                Some(failure.to_string()),
            ),
            Err(failure @ SynthesisFailure::FinalSynthesisFailed(_)) => (
                SynthesisStatus::FinalSynthesisFailed,
                None,
                Some(failure.to_string()),
            ),
        };

        Self {
            status,
            per_document,
            combined_input: result.combined_input.clone(),
            final_text,
            failure_reason,
            elapsed_seconds: round_seconds(result.elapsed.as_secs_f64()),
        }
    }
}

fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

/// Render a synthesis result as plain text for terminals and logs.
pub fn render_report(result: &SynthesisResult) -> String {
    let elapsed = round_seconds(result.elapsed.as_secs_f64());
    let mut output = String::new();

    match &result.outcome {
        Ok(text) => {
            let _ = write!(
                output,
                "Cross-Document Synthesis (completed in {elapsed}s):\n\n{text}"
            );
        }
        Err(failure @ SynthesisFailure::NoValidSummaries) => {
            output.push_str(&failure.to_string());
        }
        Err(failure @ SynthesisFailure::FinalSynthesisFailed(_)) => {
            output.push_str(&failure.to_string());
            for summary in result.document_summaries() {
                output.push_str("\n\n");
                output.push_str(&format_block(summary));
            }
        }
    }

    let skipped: Vec<_> = result.skipped().collect();
    if !skipped.is_empty() {
        output.push_str("\n\nSkipped documents:");
        for (document_id, reason) in skipped {
            let _ = write!(output, "\n- {document_id}: {reason}");
        }
    }

    output
}
