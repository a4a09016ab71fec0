//! Ollama providers for embeddings and chat completion.
//!
//! Both providers call a local Ollama server over HTTP via `reqwest`:
//! `/api/embeddings` for [`OllamaEmbeddingProvider`] and `/api/generate`
//! (non-streaming) for [`OllamaChatProvider`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::chat::ChatProvider;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// The dimensionality of `nomic-embed-text` output.
const DEFAULT_DIMENSIONS: usize = 768;

/// The default server URL.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

fn embedding_error(message: impl std::fmt::Display) -> RagError {
    RagError::Embedding { provider: "ollama".into(), message: message.to_string() }
}

fn chat_error(message: impl std::fmt::Display) -> RagError {
    RagError::Chat { provider: "ollama".into(), message: message.to_string() }
}

/// Read the error detail Ollama returns as `{"error": "..."}`, falling
/// back to the raw body.
fn error_detail(body: String) -> String {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: String,
    }
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body)
}

// ── Embeddings ─────────────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by a local Ollama server.
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbeddingProvider {
    /// Create a provider with the default model (`nomic-embed-text`) and
    /// server URL (`http://localhost:11434`).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        }
    }

    /// Set the server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the expected output dimensionality. Must match the model's
    /// actual output length and the vector database collection.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }
}

impl Default for OllamaEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(model = %self.model, text_len = text.len(), "embedding text");

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&EmbeddingRequest { model: &self.model, prompt: text })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "embedding request failed");
                embedding_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(%status, "embedding API error");
            return Err(embedding_error(format!("API returned {status}: {detail}")));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| embedding_error(format!("failed to parse response: {e}")))?;

        Ok(parsed.embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Chat ───────────────────────────────────────────────────────────

/// A [`ChatProvider`] backed by a local Ollama server.
pub struct OllamaChatProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaChatProvider {
    /// Create a provider for the given model, using the default server URL.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            model: model.into(),
        }
    }

    /// Set the server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ChatProvider for OllamaChatProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "invoking chat model");

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&GenerateRequest { model: &self.model, prompt, stream: false })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "chat request failed");
                chat_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(%status, "chat API error");
            return Err(chat_error(format!("API returned {status}: {detail}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| chat_error(format!("failed to parse response: {e}")))?;

        Ok(parsed.response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
