//! Query orchestrator: similarity search → context assembly → prompt →
//! chat completion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::chat::ChatProvider;
use crate::config::RagConfig;
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// The prompt sent to the chat model. `{context}` and `{question}` are
/// replaced at render time.
pub const PROMPT_TEMPLATE: &str = "Answer the question based only on the following context:

{context}

---

Answer the question based on the above context: {question}";

/// Delimiter between candidate contents in the assembled context.
pub const CONTEXT_DELIMITER: &str = "\n\n---\n\n";

/// A grounded answer: the chat model's response plus the `source`
/// metadata of every retrieved candidate, in retrieval order (`None`
/// where a candidate carried no source).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryAnswer {
    /// The chat model's response text.
    pub response: String,
    /// Source paths of the retrieved candidates, in order.
    pub sources: Vec<Option<String>>,
}

/// Render the prompt template with the given context and question.
pub fn render_prompt(context: &str, question: &str) -> String {
    PROMPT_TEMPLATE.replace("{context}", context).replace("{question}", question)
}

/// Answers questions against an indexed collection.
pub struct QueryService {
    store: Arc<dyn VectorStore>,
    chat: Arc<dyn ChatProvider>,
    collection: String,
    top_k: usize,
    score_threshold: f32,
}

impl QueryService {
    /// Create a query service over `collection` of the given store.
    pub fn new(
        store: Arc<dyn VectorStore>,
        chat: Arc<dyn ChatProvider>,
        collection: impl Into<String>,
        config: &RagConfig,
    ) -> Self {
        Self {
            store,
            chat,
            collection: collection.into(),
            top_k: config.top_k,
            score_threshold: config.score_threshold,
        }
    }

    /// Answer a question with retrieved context, or `None` when retrieval
    /// finds nothing confident enough.
    ///
    /// The gate is all-or-nothing on the TOP candidate's score: if the
    /// search returns nothing, or the best score is below the threshold,
    /// no context is ever sent to the chat model and `Ok(None)` is
    /// returned. Once the gate passes, the context is assembled from ALL
    /// retrieved candidates regardless of their individual scores.
    pub async fn query(&self, question: &str) -> Result<Option<QueryAnswer>> {
        let results = self
            .store
            .similarity_search_with_score(&self.collection, question, self.top_k)
            .await?;

        let top_score = results.first().map(|r| r.score);
        if top_score.is_none_or(|score| score < self.score_threshold) {
            error!(
                result_count = results.len(),
                top_score,
                threshold = self.score_threshold,
                "unable to find matching results"
            );
            return Ok(None);
        }

        let context = results
            .iter()
            .map(|r| r.document.content.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_DELIMITER);
        let prompt = render_prompt(&context, question);

        let response = self.chat.complete(&prompt).await?;

        let sources: Vec<Option<String>> =
            results.iter().map(|r| r.document.source().map(str::to_string)).collect();
        let sources_json = serde_json::to_string(&sources).unwrap_or_default();
        info!("Response: {response}\nSources: {sources_json}");

        Ok(Some(QueryAnswer { response, sources }))
    }

    /// Baseline mode: send the raw question to the chat model with no
    /// retrieval at all.
    pub async fn query_direct(&self, question: &str) -> Result<String> {
        let response = self.chat.complete(question).await?;
        info!("Response: {response}");
        Ok(response)
    }
}
