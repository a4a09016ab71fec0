//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps everything in a `HashMap` behind a
//! `tokio::sync::RwLock`. Suitable for development and tests; nothing is
//! persisted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Document, ScoredDocument};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

struct StoredDocument {
    document: Document,
    embedding: Vec<f32>,
}

/// An in-memory [`VectorStore`] using cosine similarity for search.
///
/// Collections map to vectors of stored documents; all operations are
/// async-safe via `tokio::sync::RwLock`.
pub struct InMemoryVectorStore {
    embedder: Arc<dyn EmbeddingProvider>,
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl InMemoryVectorStore {
    /// Create an empty store over the given embedder.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder, collections: RwLock::new(HashMap::new()) }
    }

    fn missing_collection(collection: &str) -> RagError {
        RagError::VectorStore {
            backend: "in-memory".to_string(),
            message: format!("collection '{collection}' does not exist"),
        }
    }
}

/// Cosine similarity of two vectors; 0.0 if either has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, collection: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default();
        Ok(())
    }

    async fn delete_collection(&self, collection: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(collection);
        Ok(())
    }

    async fn add_documents(&self, collection: &str, documents: &[Document]) -> Result<()> {
        let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let mut collections = self.collections.write().await;
        let store = collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing_collection(collection))?;
        for (document, embedding) in documents.iter().zip(embeddings) {
            store.push(StoredDocument { document: document.clone(), embedding });
        }
        Ok(())
    }

    async fn similarity_search_with_score(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        let embedding = self.embedder.embed(query).await?;

        let collections = self.collections.read().await;
        let store =
            collections.get(collection).ok_or_else(|| Self::missing_collection(collection))?;

        let mut scored: Vec<ScoredDocument> = store
            .iter()
            .map(|stored| ScoredDocument {
                document: stored.document.clone(),
                score: cosine_similarity(&stored.embedding, &embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}
