//! Indexing orchestrator: load → split → batched upsert.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use crate::config::RagConfig;
use crate::document::Document;
use crate::error::Result;
use crate::loader::FolderLoader;
use crate::splitter::TextSplitter;
use crate::vectorstore::VectorStore;

/// Sequences folder loading, chunking, and batched writes into the
/// vector store.
///
/// Batches are written strictly in order, one at a time; a failed batch
/// aborts the run with nothing after it attempted. Chunks already written
/// by earlier batches stay in the store (no rollback).
pub struct Indexer {
    store: Arc<dyn VectorStore>,
    collection: String,
    loader: FolderLoader,
    splitter: TextSplitter,
    batch_size: usize,
}

impl Indexer {
    /// Create an indexer writing to `collection` of the given store.
    pub fn new(store: Arc<dyn VectorStore>, collection: impl Into<String>, config: &RagConfig) -> Self {
        Self {
            store,
            collection: collection.into(),
            loader: FolderLoader::new(),
            splitter: TextSplitter::new(config.chunk_size, config.chunk_overlap),
            batch_size: config.batch_size,
        }
    }

    /// Replace the default loader, e.g. to register extra parsers.
    pub fn with_loader(mut self, loader: FolderLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Index every parseable file under `folder`: load, split, then
    /// upsert the chunks.
    pub async fn index_folder(&self, folder: impl AsRef<Path>) -> Result<()> {
        let documents = self.loader.load_documents(folder)?;
        let chunks = self.splitter.split_documents(&documents);
        self.index_documents(&chunks).await
    }

    /// Upsert pre-split chunks in consecutive batches of `batch_size`
    /// (the last batch may be smaller).
    ///
    /// # Errors
    ///
    /// The first failing batch's error is logged and returned
    /// immediately; later batches are never attempted.
    pub async fn index_documents(&self, chunks: &[Document]) -> Result<()> {
        if chunks.is_empty() {
            info!("no chunks to index");
            return Ok(());
        }

        let total = chunks.len().div_ceil(self.batch_size);
        for (i, batch) in chunks.chunks(self.batch_size).enumerate() {
            self.store.add_documents(&self.collection, batch).await.map_err(|e| {
                error!(batch = i + 1, total, error = %e, "batch upsert failed, aborting");
                e
            })?;
            info!(batch = i + 1, total, size = batch.len(), "indexed batch");
        }

        info!(chunk_count = chunks.len(), collection = %self.collection, "indexing complete");
        Ok(())
    }
}
