//! # raglet — a minimal local RAG pipeline
//!
//! Loads documents from a folder, splits them into overlapping chunks,
//! embeds the chunks with a local model, stores the vectors in Qdrant,
//! and answers questions by retrieving the most similar chunks and
//! forwarding them as context to a chat model.
//!
//! ## Architecture
//!
//! - [`loader`] — recursive folder loading with per-extension parsers
//! - [`splitter`] — recursive chunking at natural boundaries with overlap
//! - [`embedding`] / [`chat`] — provider traits for the model server
//! - [`vectorstore`] — text-level vector database adapter trait
//! - [`ollama`], [`qdrant`], [`inmemory`] — bundled backends
//! - [`indexer`] — load → split → batched upsert orchestration
//! - [`query`] — search → gate → prompt → completion orchestration
//!
//! Everything is strictly sequential: one batch, one search, one
//! completion at a time. Failures from any dependency abort the current
//! operation and surface to the caller; there are no retries.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use raglet::{Indexer, OllamaChatProvider, OllamaEmbeddingProvider,
//!              QdrantVectorStore, QueryService, RagConfig};
//!
//! let config = RagConfig::default();
//! let embedder = Arc::new(OllamaEmbeddingProvider::new());
//! let store = Arc::new(QdrantVectorStore::new("http://localhost:6334", embedder)?);
//!
//! store.create_collection("documents").await?;
//! Indexer::new(store.clone(), "documents", &config).index_folder("./docs").await?;
//!
//! let chat = Arc::new(OllamaChatProvider::new("mistral"));
//! let service = QueryService::new(store, chat, "documents", &config);
//! if let Some(answer) = service.query("what is a raglet?").await? {
//!     println!("{}", answer.response);
//! }
//! ```

pub mod chat;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod inmemory;
pub mod loader;
pub mod ollama;
pub mod qdrant;
pub mod query;
pub mod splitter;
pub mod vectorstore;

pub use chat::ChatProvider;
pub use config::{RagConfig, RagConfigBuilder, Settings};
pub use document::{Document, Metadata, ScoredDocument};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use indexer::Indexer;
pub use inmemory::InMemoryVectorStore;
pub use loader::{FileParser, FolderLoader};
pub use ollama::{OllamaChatProvider, OllamaEmbeddingProvider};
pub use qdrant::QdrantVectorStore;
pub use query::{render_prompt, QueryAnswer, QueryService, CONTEXT_DELIMITER, PROMPT_TEMPLATE};
pub use splitter::TextSplitter;
pub use vectorstore::VectorStore;
