//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that turns text into fixed-length embedding vectors.
///
/// Implementations wrap a specific backend behind a unified async
/// interface. The default [`embed_batch`](EmbeddingProvider::embed_batch)
/// calls [`embed`](EmbeddingProvider::embed) sequentially; backends with
/// native batching should override it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The dimensionality of embeddings produced by this provider. Must
    /// match the vector database collection's configured dimension.
    fn dimensions(&self) -> usize;
}
