//! Configuration for the indexing and query pipelines.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Tuning parameters for chunking, batching, and retrieval.
///
/// Resolved once at construction and never re-read mid-operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    /// Must be less than `chunk_size`.
    pub chunk_overlap: usize,
    /// Number of chunks per vector store write.
    pub batch_size: usize,
    /// Number of candidates requested from similarity search.
    pub top_k: usize,
    /// Minimum similarity score the best candidate must reach before any
    /// context is sent to the chat model.
    pub score_threshold: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunk_size: 500, chunk_overlap: 100, batch_size: 10, top_k: 5, score_threshold: 0.6 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the target chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of chunks per vector store write.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the number of candidates requested from similarity search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum score the top candidate must reach.
    pub fn score_threshold(mut self, threshold: f32) -> Self {
        self.config.score_threshold = threshold;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `batch_size == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.batch_size == 0 {
            return Err(RagError::Config("batch_size must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

/// Process-level settings read from the environment at startup.
///
/// Everything the pipelines need to reach their external collaborators:
/// the model server for embeddings and chat, and the vector database.
/// Read once (in `main`, after `dotenvy` has loaded any `.env` file) and
/// passed by reference into constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Embedding model identifier (`RAGLET_EMBEDDING_MODEL`).
    pub embedding_model: String,
    /// Chat model identifier (`RAGLET_CHAT_MODEL`).
    pub chat_model: String,
    /// Base URL of the model server (`RAGLET_CHAT_URL`).
    pub chat_url: String,
    /// Vector database URL (`RAGLET_QDRANT_URL`).
    pub qdrant_url: String,
    /// Vector database collection name (`RAGLET_COLLECTION`).
    pub collection: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            embedding_model: "nomic-embed-text".to_string(),
            chat_model: "mistral".to_string(),
            chat_url: "http://localhost:11434".to_string(),
            qdrant_url: "http://localhost:6334".to_string(),
            collection: "documents".to_string(),
        }
    }
}

impl Settings {
    /// Resolve settings from the environment, falling back to defaults
    /// for any unset variable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            embedding_model: env_or("RAGLET_EMBEDDING_MODEL", defaults.embedding_model),
            chat_model: env_or("RAGLET_CHAT_MODEL", defaults.chat_model),
            chat_url: env_or("RAGLET_CHAT_URL", defaults.chat_url),
            qdrant_url: env_or("RAGLET_QDRANT_URL", defaults.qdrant_url),
            collection: env_or("RAGLET_COLLECTION", defaults.collection),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 100);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.score_threshold, 0.6);
    }

    #[test]
    fn builder_rejects_overlap_not_less_than_size() {
        let err = RagConfig::builder().chunk_size(100).chunk_overlap(100).build();
        assert!(err.is_err());
    }

    #[test]
    fn builder_rejects_zero_top_k() {
        assert!(RagConfig::builder().top_k(0).build().is_err());
    }

    #[test]
    fn builder_rejects_zero_batch_size() {
        assert!(RagConfig::builder().batch_size(0).build().is_err());
    }
}
