//! LLM completion collaborator

mod client;
mod openai;
mod stream;

pub use client::CompletionClient;
#[cfg(test)]
pub use client::MockCompletionClient;
pub use openai::{OpenAiClient, ProgressFn};
