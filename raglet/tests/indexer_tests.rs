//! Indexer batching contract, verified against a recording store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use raglet::{Document, Indexer, RagConfig, RagError, ScoredDocument, VectorStore};

/// Records every add-documents call; optionally fails on call `fail_at`
/// (1-based). Failing calls are recorded too, so assertions can verify
/// nothing runs after a failure.
#[derive(Default)]
struct RecordingStore {
    /// (collection, batch size, first chunk content) per call, in order.
    calls: Mutex<Vec<(String, usize, String)>>,
    fail_at: Option<usize>,
}

impl RecordingStore {
    fn failing_at(call: usize) -> Self {
        Self { calls: Mutex::new(Vec::new()), fail_at: Some(call) }
    }

    fn calls(&self) -> Vec<(String, usize, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for RecordingStore {
    async fn create_collection(&self, _collection: &str) -> raglet::Result<()> {
        Ok(())
    }

    async fn delete_collection(&self, _collection: &str) -> raglet::Result<()> {
        Ok(())
    }

    async fn add_documents(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> raglet::Result<()> {
        let mut calls = self.calls.lock().unwrap();
        let first = documents.first().map(|d| d.content.clone()).unwrap_or_default();
        calls.push((collection.to_string(), documents.len(), first));

        if self.fail_at == Some(calls.len()) {
            return Err(RagError::VectorStore {
                backend: "recording".to_string(),
                message: "forced failure".to_string(),
            });
        }
        Ok(())
    }

    async fn similarity_search_with_score(
        &self,
        _collection: &str,
        _query: &str,
        _top_k: usize,
    ) -> raglet::Result<Vec<ScoredDocument>> {
        Ok(Vec::new())
    }
}

fn chunks(n: usize) -> Vec<Document> {
    (0..n).map(|i| Document::new(format!("chunk-{i:02}"))).collect()
}

fn config(batch_size: usize) -> RagConfig {
    RagConfig::builder().batch_size(batch_size).build().unwrap()
}

#[tokio::test]
async fn zero_chunks_performs_zero_store_calls() {
    let store = Arc::new(RecordingStore::default());
    let indexer = Indexer::new(store.clone(), "docs", &config(10));

    indexer.index_documents(&[]).await.unwrap();

    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn batches_are_sized_and_ordered() {
    let store = Arc::new(RecordingStore::default());
    let indexer = Indexer::new(store.clone(), "docs", &config(10));

    indexer.index_documents(&chunks(25)).await.unwrap();

    let calls = store.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls,
        vec![
            ("docs".to_string(), 10, "chunk-00".to_string()),
            ("docs".to_string(), 10, "chunk-10".to_string()),
            ("docs".to_string(), 5, "chunk-20".to_string()),
        ]
    );
}

#[tokio::test]
async fn a_failed_batch_aborts_the_remaining_batches() {
    let store = Arc::new(RecordingStore::failing_at(2));
    let indexer = Indexer::new(store.clone(), "docs", &config(10));

    let err = indexer.index_documents(&chunks(25)).await.unwrap_err();

    assert!(matches!(err, RagError::VectorStore { .. }));
    // Call 1 succeeded, call 2 failed, call 3 never happened.
    assert_eq!(store.calls().len(), 2);
}

#[tokio::test]
async fn index_folder_loads_splits_and_upserts() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("note.txt"), "the quick brown fox jumps over the lazy dog")
        .unwrap();

    let store = Arc::new(RecordingStore::default());
    let indexer = Indexer::new(store.clone(), "docs", &RagConfig::default());

    indexer.index_folder(temp.path()).await.unwrap();

    let calls = store.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "docs");
    assert_eq!(calls[0].2, "the quick brown fox jumps over the lazy dog");
}
