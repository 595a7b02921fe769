//! Helpers for normalizing extracted text and caller-supplied identifiers.

use std::collections::HashSet;

use super::types::{BatchError, Document};

/// Lines at or below this trimmed length are treated as extraction noise.
pub const MIN_LINE_CHARS: usize = 30;

/// Normalize raw extracted text into summarizable prose.
///
/// Keeps only lines whose trimmed length exceeds [`MIN_LINE_CHARS`] characters and joins them
/// with single spaces. Page headers, footers, and stray fragments fall out this way. An empty
/// result means the document has no extractable content.
pub fn clean_text(raw_text: &str) -> String {
    raw_text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_LINE_CHARS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sanitize arbitrary string input by trimming whitespace and dropping empties.
pub(crate) fn sanitize_string(value: Option<String>) -> Option<String> {
    value.and_then(|input| {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Normalize a document identifier, falling back to its 1-based batch position.
pub fn sanitize_document_id(value: Option<String>, position: usize) -> String {
    sanitize_string(value).unwrap_or_else(|| format!("document-{position}"))
}

/// Return the first identifier that appears more than once, if any.
pub fn find_duplicate_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

/// Turn caller-supplied `(id, text)` pairs into a batch of documents.
///
/// Ids are normalized with [`sanitize_document_id`] using 1-based positions. Empty batches and
/// batches whose ids collide after normalization are rejected.
pub fn prepare_documents<I>(inputs: I) -> Result<Vec<Document>, BatchError>
where
    I: IntoIterator<Item = (Option<String>, String)>,
{
    let documents: Vec<Document> = inputs
        .into_iter()
        .enumerate()
        .map(|(index, (id, text))| Document::new(sanitize_document_id(id, index + 1), text))
        .collect();

    if documents.is_empty() {
        return Err(BatchError::Empty);
    }
    if let Some(duplicate) = find_duplicate_id(documents.iter().map(|doc| doc.id.as_str())) {
        return Err(BatchError::DuplicateId(duplicate.to_string()));
    }
    Ok(documents)
}
