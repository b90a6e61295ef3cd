//! Model runtime seam

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A runtime that serves completions for a loaded model
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
