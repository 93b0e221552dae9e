//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A chat-completion backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from the conversation in `request`
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Provider name used in logs
    fn name(&self) -> &str;
}
