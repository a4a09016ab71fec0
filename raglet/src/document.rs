//! Data types for documents, chunks, and scored search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key-value metadata attached to a document. Values are arbitrary JSON so
/// parsers can record numbers (row indices, page numbers) alongside strings.
pub type Metadata = HashMap<String, Value>;

/// A piece of text with provenance metadata.
///
/// Produced by the loader from a single file, then re-produced by the
/// splitter as bounded-length chunks. Chunks are plain `Document` values:
/// their content is a slice of the parent's content and their metadata is
/// the parent's metadata plus a `chunk_index` field. Neither stage mutates
/// its input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The text content.
    pub content: String,
    /// Key-value metadata (source path, load origin, chunk index, ...).
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with empty metadata.
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), metadata: Metadata::new() }
    }

    /// Create a document with the given metadata.
    pub fn with_metadata(content: impl Into<String>, metadata: Metadata) -> Self {
        Self { content: content.into(), metadata }
    }

    /// The `source` metadata field, if present and a string.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(Value::as_str)
    }
}

/// A retrieved [`Document`] paired with a similarity score.
///
/// Higher is more similar. The scale depends on the backend's metric
/// (cosine for the bundled backends) and is not normalized here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// The retrieved document.
    pub document: Document,
    /// The similarity score reported by the backend.
    pub score: f32,
}
