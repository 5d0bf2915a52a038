use crate::error::RcaResult;
use crate::summarizer::Prompt;
use async_trait::async_trait;

/// Stateless text-in/text-out completion service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete the prompt and return the generated text
    async fn complete(&self, prompt: &Prompt) -> RcaResult<String>;
}
