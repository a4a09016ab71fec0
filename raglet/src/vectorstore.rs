//! Vector store trait for persisting and retrieving documents by
//! similarity.

use async_trait::async_trait;

use crate::document::{Document, ScoredDocument};
use crate::error::Result;

/// A vector database adapter keyed by document text.
///
/// Implementations own an embedding provider and embed internally, so
/// callers pass text both when storing and when searching; raw vectors
/// never cross this interface. Collections are named partitions holding
/// vectors of one fixed dimensionality; the collection name is passed per
/// call so one store can serve several collections.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection sized to the embedder's dimensionality.
    /// No-op if it already exists.
    async fn create_collection(&self, collection: &str) -> Result<()>;

    /// Delete a named collection and all its data.
    async fn delete_collection(&self, collection: &str) -> Result<()>;

    /// Embed and store documents in a collection.
    async fn add_documents(&self, collection: &str, documents: &[Document]) -> Result<()>;

    /// Return the `top_k` most similar documents to the query text.
    async fn similarity_search(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<Document>> {
        let scored = self.similarity_search_with_score(collection, query, top_k).await?;
        Ok(scored.into_iter().map(|s| s.document).collect())
    }

    /// Return the `top_k` most similar documents to the query text, each
    /// paired with its similarity score, ordered by descending score.
    async fn similarity_search_with_score(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>>;
}
