//! Fixed-window chunking.
//!
//! Text is cut into consecutive, non-overlapping windows of at most `size` units, in original
//! order. Two units are supported:
//!
//! - [`ChunkUnit::Words`]: windows of whitespace-separated words, re-joined with single spaces.
//!   Used for per-document summarization ahead of a synthesis.
//! - [`ChunkUnit::Characters`]: windows of Unicode scalar values sliced straight out of the input,
//!   so concatenating the chunks reproduces the input byte for byte. Used for direct text
//!   summarization.
//!
//! Either way the last window may be shorter, and the chunk index is the only ordering key
//! callers should rely on.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use super::types::Chunk;

/// Unit in which a chunk size is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkUnit {
    /// Whitespace-separated words.
    Words,
    /// Unicode scalar values.
    Characters,
}

impl FromStr for ChunkUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "words" | "word" => Ok(Self::Words),
            "characters" | "chars" | "character" => Ok(Self::Characters),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ChunkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Words => f.write_str("words"),
            Self::Characters => f.write_str("characters"),
        }
    }
}

/// Split `text` into ordered chunks of at most `size` units.
///
/// Returns an empty vector for empty input.
pub fn chunk_text(
    document_id: &str,
    text: &str,
    unit: ChunkUnit,
    size: NonZeroUsize,
) -> Vec<Chunk> {
    let size = size.get();
    let windows = match unit {
        ChunkUnit::Words => word_windows(text, size),
        ChunkUnit::Characters => char_windows(text, size),
    };

    windows
        .into_iter()
        .enumerate()
        .map(|(index, window)| Chunk {
            document_id: document_id.to_string(),
            index,
            word_count: count_words(&window),
            text: window,
        })
        .collect()
}

fn word_windows(text: &str, size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(size).map(|window| window.join(" ")).collect()
}

fn char_windows(text: &str, size: usize) -> Vec<String> {
    let mut windows = Vec::with_capacity(text.len() / size + 1);
    let mut start = 0;
    while start < text.len() {
        let end = text[start..]
            .char_indices()
            .nth(size)
            .map(|(offset, _)| start + offset)
            .unwrap_or(text.len());
        windows.push(text[start..end].to_string());
        start = end;
    }
    windows
}

/// Count whitespace-separated words.
pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
