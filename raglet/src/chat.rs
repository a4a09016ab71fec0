//! Chat provider trait for single-shot prompt completion.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that completes a prompt with a chat model.
///
/// The pipeline only needs single-shot completion: one rendered prompt
/// in, one response string out. Streaming, tool use, and conversation
/// state are out of scope.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Complete the prompt and return the response text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// The model identifier this provider invokes.
    fn model(&self) -> &str;
}
