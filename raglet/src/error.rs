//! Error types for the `raglet` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the indexing and query pipelines.
#[derive(Debug, Error)]
pub enum RagError {
    /// A file or folder could not be read or parsed during loading.
    #[error("Loader error ({}): {message}", path.display())]
    Loader {
        /// The file or folder that failed to load.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred while invoking the chat model.
    #[error("Chat error ({provider}): {message}")]
    Chat {
        /// The chat provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error in pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
