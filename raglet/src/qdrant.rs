//! Qdrant vector store backend.
//!
//! [`QdrantVectorStore`] implements [`VectorStore`] over the
//! [qdrant-client](https://docs.rs/qdrant-client) gRPC client. Documents
//! are embedded with the configured [`EmbeddingProvider`] on the way in
//! and out; collections use cosine distance, which the query gate's score
//! threshold assumes.

use std::sync::Arc;

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::debug;
use uuid::Uuid;

use crate::document::{Document, Metadata, ScoredDocument};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// A [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Document text is stored under the `content` payload key and metadata
/// under `metadata`; point IDs are fresh UUIDs per upsert.
pub struct QdrantVectorStore {
    client: Qdrant,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl QdrantVectorStore {
    /// Connect to Qdrant at the given URL.
    pub fn new(url: &str, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(map_err)?;
        Ok(Self { client, embedder })
    }

    /// Wrap an existing client.
    pub fn from_client(client: Qdrant, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { client, embedder }
    }
}

fn map_err(e: qdrant_client::QdrantError) -> RagError {
    RagError::VectorStore { backend: "qdrant".to_string(), message: e.to_string() }
}

/// Convert a Qdrant payload value into plain JSON.
fn payload_to_json(value: &QdrantValue) -> serde_json::Value {
    match &value.kind {
        Some(Kind::StringValue(s)) => serde_json::Value::String(s.clone()),
        Some(Kind::IntegerValue(i)) => serde_json::Value::from(*i),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(*d)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(*b),
        Some(Kind::StructValue(s)) => serde_json::Value::Object(
            s.fields.iter().map(|(k, v)| (k.clone(), payload_to_json(v))).collect(),
        ),
        Some(Kind::ListValue(l)) => {
            serde_json::Value::Array(l.values.iter().map(payload_to_json).collect())
        }
        Some(Kind::NullValue(_)) | None => serde_json::Value::Null,
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn create_collection(&self, collection: &str) -> Result<()> {
        let collections = self.client.list_collections().await.map_err(map_err)?;
        if collections.collections.iter().any(|c| c.name == collection) {
            debug!(collection, "qdrant collection already exists, skipping creation");
            return Ok(());
        }

        let dimensions = self.embedder.dimensions();
        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(map_err)?;

        debug!(collection, dimensions, "created qdrant collection");
        Ok(())
    }

    async fn delete_collection(&self, collection: &str) -> Result<()> {
        self.client.delete_collection(collection).await.map_err(map_err)?;
        debug!(collection, "deleted qdrant collection");
        Ok(())
    }

    async fn add_documents(&self, collection: &str, documents: &[Document]) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let points: Vec<PointStruct> = documents
            .iter()
            .zip(embeddings)
            .map(|(document, embedding)| {
                let mut payload_map = serde_json::Map::new();
                payload_map.insert(
                    "content".to_string(),
                    serde_json::Value::String(document.content.clone()),
                );
                payload_map.insert(
                    "metadata".to_string(),
                    serde_json::Value::Object(document.metadata.clone().into_iter().collect()),
                );
                let payload =
                    Payload::try_from(serde_json::Value::Object(payload_map)).unwrap_or_default();

                PointStruct::new(Uuid::new_v4().to_string(), embedding, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(map_err)?;

        debug!(collection, count = documents.len(), "upserted documents to qdrant");
        Ok(())
    }

    async fn similarity_search_with_score(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        let embedding = self.embedder.embed(query).await?;

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, embedding, top_k as u64).with_payload(true),
            )
            .await
            .map_err(map_err)?;

        let results = response
            .result
            .into_iter()
            .map(|scored| {
                let content = scored
                    .payload
                    .get("content")
                    .and_then(|v| match &v.kind {
                        Some(Kind::StringValue(s)) => Some(s.clone()),
                        _ => None,
                    })
                    .unwrap_or_default();

                let metadata: Metadata = scored
                    .payload
                    .get("metadata")
                    .and_then(|v| match &v.kind {
                        Some(Kind::StructValue(s)) => Some(
                            s.fields
                                .iter()
                                .map(|(k, v)| (k.clone(), payload_to_json(v)))
                                .collect(),
                        ),
                        _ => None,
                    })
                    .unwrap_or_default();

                ScoredDocument {
                    document: Document::with_metadata(content, metadata),
                    score: scored.score,
                }
            })
            .collect();

        Ok(results)
    }
}
