//! Query gate semantics, context assembly, and prompt rendering.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use raglet::{
    render_prompt, ChatProvider, Document, QueryService, RagConfig, ScoredDocument, VectorStore,
};
use serde_json::json;

/// Returns a preset result list and records the last search request.
struct StubStore {
    results: Vec<ScoredDocument>,
    last_search: Mutex<Option<(String, usize)>>,
}

impl StubStore {
    fn with_results(results: Vec<ScoredDocument>) -> Self {
        Self { results, last_search: Mutex::new(None) }
    }
}

#[async_trait]
impl VectorStore for StubStore {
    async fn create_collection(&self, _collection: &str) -> raglet::Result<()> {
        Ok(())
    }

    async fn delete_collection(&self, _collection: &str) -> raglet::Result<()> {
        Ok(())
    }

    async fn add_documents(
        &self,
        _collection: &str,
        _documents: &[Document],
    ) -> raglet::Result<()> {
        Ok(())
    }

    async fn similarity_search_with_score(
        &self,
        _collection: &str,
        query: &str,
        top_k: usize,
    ) -> raglet::Result<Vec<ScoredDocument>> {
        *self.last_search.lock().unwrap() = Some((query.to_string(), top_k));
        Ok(self.results.clone())
    }
}

/// Replies with a canned string and records every prompt it receives.
struct StubChat {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl StubChat {
    fn new(reply: &str) -> Self {
        Self { reply: reply.to_string(), prompts: Mutex::new(Vec::new()) }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for StubChat {
    async fn complete(&self, prompt: &str) -> raglet::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "stub"
    }
}

fn scored(content: &str, source: Option<&str>, score: f32) -> ScoredDocument {
    let mut document = Document::new(content);
    if let Some(source) = source {
        document.metadata.insert("source".to_string(), json!(source));
    }
    ScoredDocument { document, score }
}

fn service(
    results: Vec<ScoredDocument>,
    reply: &str,
) -> (QueryService, Arc<StubStore>, Arc<StubChat>) {
    let store = Arc::new(StubStore::with_results(results));
    let chat = Arc::new(StubChat::new(reply));
    let service = QueryService::new(store.clone(), chat.clone(), "docs", &RagConfig::default());
    (service, store, chat)
}

#[tokio::test]
async fn empty_results_answer_nothing_and_skip_the_chat_model() {
    let (service, _store, chat) = service(Vec::new(), "unused");

    let answer = service.query("anything").await.unwrap();

    assert!(answer.is_none());
    assert!(chat.prompts().is_empty());
}

#[tokio::test]
async fn low_top_score_answers_nothing_even_when_later_scores_pass() {
    // The gate looks only at the first result's score; deliberately feed
    // a higher score further down to pin that behavior.
    let results = vec![scored("A", Some("a.txt"), 0.59), scored("B", Some("b.txt"), 0.8)];
    let (service, _store, chat) = service(results, "unused");

    let answer = service.query("anything").await.unwrap();

    assert!(answer.is_none());
    assert!(chat.prompts().is_empty());
}

#[tokio::test]
async fn threshold_is_inclusive() {
    let results = vec![scored("A", Some("a.txt"), 0.6)];
    let (service, _store, _chat) = service(results, "fine");

    let answer = service.query("anything").await.unwrap();

    assert!(answer.is_some());
}

#[tokio::test]
async fn sources_follow_candidate_order_with_none_for_missing() {
    let results = vec![
        scored("A", Some("a.txt"), 0.9),
        scored("B", None, 0.3),
        scored("C", Some("c.txt"), 0.2),
    ];
    let (service, _store, _chat) = service(results, "ok");

    let answer = service.query("anything").await.unwrap().unwrap();

    assert_eq!(answer.response, "ok");
    assert_eq!(
        answer.sources,
        vec![Some("a.txt".to_string()), None, Some("c.txt".to_string())]
    );
}

#[tokio::test]
async fn context_joins_all_candidates_and_fills_the_template() {
    // Once the top score passes the gate, every candidate lands in the
    // context regardless of its own score.
    let results = vec![scored("A", Some("a.txt"), 0.9), scored("B", Some("b.txt"), 0.75)];
    let (service, _store, chat) = service(results, "an answer");

    let answer = service.query("Q").await.unwrap().unwrap();

    let prompts = chat.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0], render_prompt("A\n\n---\n\nB", "Q"));
    assert!(prompts[0].contains("A\n\n---\n\nB"));
    assert!(prompts[0].ends_with("Answer the question based on the above context: Q"));
    assert_eq!(answer.sources.len(), 2);
}

#[tokio::test]
async fn search_requests_the_configured_top_k() {
    let results = vec![scored("A", Some("a.txt"), 0.9)];
    let (service, store, _chat) = service(results, "ok");

    service.query("the question").await.unwrap();

    let last = store.last_search.lock().unwrap().clone();
    assert_eq!(last, Some(("the question".to_string(), 5)));
}

#[tokio::test]
async fn direct_mode_sends_the_raw_question() {
    let (service, store, chat) = service(Vec::new(), "baseline");

    let response = service.query_direct("just asking").await.unwrap();

    assert_eq!(response, "baseline");
    assert_eq!(chat.prompts(), vec!["just asking".to_string()]);
    assert!(store.last_search.lock().unwrap().is_none());
}
