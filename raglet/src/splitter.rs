//! Recursive text splitting with bounded overlap.
//!
//! [`TextSplitter`] breaks document content into chunks of at most
//! `chunk_size` bytes, preferring the largest separator that fits the
//! budget: paragraph breaks, then line breaks, then sentence-ending
//! punctuation, then clause punctuation, then spaces, and finally single
//! characters. Adjacent chunks share roughly `chunk_overlap` bytes of
//! trailing content.

use std::collections::VecDeque;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::document::Document;

/// Separator hierarchy, largest unit first. An empty match at the end of
/// the list is represented by the character-level fallback in
/// [`split_chars`].
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "! ", "? ", "; ", ", ", " "];

/// Splits document content into overlapping chunks at natural boundaries.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a new splitter.
    ///
    /// `chunk_overlap` must be less than `chunk_size`; the config builder
    /// enforces this before a splitter is ever constructed from it.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }

    /// Split every document into chunks, carrying each parent's metadata
    /// onto its chunks plus a `chunk_index` field.
    ///
    /// Empty input yields empty output with a log line and no error.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        if documents.is_empty() {
            warn!("no documents to split");
            return Vec::new();
        }

        let mut chunks = Vec::new();
        for document in documents {
            for (i, text) in self.split_text(&document.content).into_iter().enumerate() {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), json!(i));
                chunks.push(Document::with_metadata(text, metadata));
            }
        }

        info!(
            document_count = documents.len(),
            chunk_count = chunks.len(),
            "split documents into chunks"
        );
        if let Some(sample) = chunks.get(2) {
            debug!(content = %sample.content, metadata = ?sample.metadata, "sample chunk");
        }

        chunks
    }

    /// Split raw text into chunk strings.
    ///
    /// Concatenating the produced chunks with their overlap regions removed
    /// reconstructs the input; no characters are dropped or inserted.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let pieces = split_recursive(text, self.chunk_size, SEPARATORS);
        self.merge_pieces(pieces)
    }

    /// Merge separator-bounded pieces into chunks of at most `chunk_size`
    /// bytes, re-seeding each new chunk with the trailing pieces of the
    /// previous one up to `chunk_overlap` bytes.
    fn merge_pieces(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<String> = VecDeque::new();
        let mut window_len = 0usize;

        for piece in pieces {
            let fits = window_len + piece.len() <= self.chunk_size;
            if !fits && !window.is_empty() {
                chunks.push(window.iter().map(String::as_str).collect::<String>());
                // Retain a tail of at most chunk_overlap bytes, and keep
                // draining until the incoming piece fits the budget.
                while !window.is_empty()
                    && (window_len > self.chunk_overlap
                        || window_len + piece.len() > self.chunk_size)
                {
                    if let Some(front) = window.pop_front() {
                        window_len -= front.len();
                    }
                }
            }
            window_len += piece.len();
            window.push_back(piece);
        }

        // The final window always holds the last piece, which no emitted
        // chunk has covered yet.
        if !window.is_empty() {
            chunks.push(window.iter().map(String::as_str).collect());
        }

        chunks
    }
}

/// Recursively split `text` into pieces of at most `chunk_size` bytes,
/// trying each separator in order and keeping separators attached to the
/// preceding piece. A run with no separator at all is cut at character
/// boundaries as a last resort.
fn split_recursive(text: &str, chunk_size: usize, separators: &[&str]) -> Vec<String> {
    if text.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let Some((separator, rest)) = separators.split_first() else {
        return split_chars(text, chunk_size);
    };

    let segments = split_keeping_separator(text, separator);
    if segments.len() <= 1 {
        // Separator not present; fall through to the next one.
        return split_recursive(text, chunk_size, rest);
    }

    let mut pieces = Vec::new();
    for segment in segments {
        if segment.len() > chunk_size {
            pieces.extend(split_recursive(segment, chunk_size, rest));
        } else {
            pieces.push(segment.to_string());
        }
    }
    pieces
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment, so that concatenating segments reproduces the input.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        segments.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        segments.push(&text[start..]);
    }

    segments
}

/// Hard cut at character boundaries for runs with no usable separator.
fn split_chars(text: &str, chunk_size: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if current.len() + ch.len_utf8() > chunk_size && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}
