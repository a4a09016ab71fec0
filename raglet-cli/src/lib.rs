//! Shared wiring for the raglet binaries: tracing setup and provider
//! construction from environment-driven [`Settings`].

use std::sync::Arc;

use raglet::{
    OllamaChatProvider, OllamaEmbeddingProvider, QdrantVectorStore, Settings,
};
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber, honoring `RUST_LOG` and defaulting to
/// `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}

/// Build the Qdrant store with an Ollama embedder, both configured from
/// settings.
pub fn build_store(settings: &Settings) -> anyhow::Result<Arc<QdrantVectorStore>> {
    let embedder = Arc::new(
        OllamaEmbeddingProvider::new()
            .with_base_url(&settings.chat_url)
            .with_model(&settings.embedding_model),
    );
    Ok(Arc::new(QdrantVectorStore::new(&settings.qdrant_url, embedder)?))
}

/// Build the Ollama chat provider configured from settings.
pub fn build_chat(settings: &Settings) -> Arc<OllamaChatProvider> {
    Arc::new(OllamaChatProvider::new(&settings.chat_model).with_base_url(&settings.chat_url))
}
