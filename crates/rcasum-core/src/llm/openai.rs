//! OpenAI-compatible chat completion client

use super::client::CompletionClient;
use super::stream::{SseDecoder, StreamEvent};
use crate::config::{LlmConfig, timeouts};
use crate::error::{RcaError, RcaResult, sanitize_error_text};
use crate::summarizer::Prompt;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, instrument};

const PROVIDER: &str = "openai";

/// Callback receiving the number of content bytes streamed so far
pub type ProgressFn = Arc<dyn Fn(usize) + Send + Sync>;

/// Chat completion client for OpenAI and compatible endpoints
pub struct OpenAiClient {
    config: LlmConfig,
    http_client: Client,
    progress: Option<ProgressFn>,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> RcaResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(timeouts::llm::connection_timeout())
            .timeout(config.timeout)
            .build()
            .map_err(|e| RcaError::config(format!("Failed to build LLM HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            progress: None,
        })
    }

    /// Stream the completion and report received bytes to `progress`
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    fn request_body(&self, prompt: &Prompt, stream: bool) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.document },
            ],
        });
        if let Some(max_tokens) = self.config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = self.config.temperature {
            body["temperature"] = json!(temperature);
        }
        if stream {
            body["stream"] = json!(true);
        }
        body
    }

    async fn send(&self, body: &Value) -> RcaResult<reqwest::Response> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let mut request = self.http_client.post(&url).json(body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        debug!("HTTP Request: POST {} \"{}\"", url, status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &error_text));
        }
        Ok(response)
    }

    fn transport_error(&self, e: reqwest::Error) -> RcaError {
        if e.is_timeout() {
            RcaError::timeout_with_context(self.config.timeout.as_secs(), "LLM completion")
        } else {
            RcaError::llm_with_provider(format!("OpenAI request failed: {}", e), PROVIDER)
        }
    }

    async fn complete_blocking(&self, prompt: &Prompt) -> RcaResult<String> {
        let response = self.send(&self.request_body(prompt, false)).await?;
        let response_json: Value = response.json().await.map_err(|e| {
            RcaError::llm_with_provider(format!("Failed to parse OpenAI response: {}", e), PROVIDER)
        })?;
        parse_completion(&response_json)
    }

    async fn complete_streaming(&self, prompt: &Prompt, progress: &ProgressFn) -> RcaResult<String> {
        let response = self.send(&self.request_body(prompt, true)).await?;
        let mut bytes = response.bytes_stream();
        let mut decoder = SseDecoder::default();
        let mut content = String::new();

        'read: while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|e| self.transport_error(e))?;
            for event in decoder.push(&chunk) {
                match event {
                    StreamEvent::Content(delta) => {
                        content.push_str(&delta);
                        progress(content.len());
                    }
                    StreamEvent::Done => break 'read,
                }
            }
        }

        non_blank(content)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    #[instrument(skip(self, prompt), fields(model = %self.config.model), level = "debug")]
    async fn complete(&self, prompt: &Prompt) -> RcaResult<String> {
        match &self.progress {
            Some(progress) => self.complete_streaming(prompt, progress).await,
            None => self.complete_blocking(prompt).await,
        }
    }
}

fn status_error(status: StatusCode, body: &str) -> RcaError {
    let detail = sanitize_error_text(body);
    let message = if status == StatusCode::TOO_MANY_REQUESTS {
        format!("OpenAI rate limit exceeded (status {}): {}", status, detail)
    } else {
        format!("OpenAI API error (status {}): {}", status, detail)
    };
    RcaError::llm_with_status(message, PROVIDER, status.as_u16())
}

fn parse_completion(response: &Value) -> RcaResult<String> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| RcaError::llm_with_provider("OpenAI response has no message content", PROVIDER))?;
    non_blank(content.to_string())
}

fn non_blank(content: String) -> RcaResult<String> {
    if content.trim().is_empty() {
        return Err(RcaError::llm_with_provider("OpenAI returned an empty completion", PROVIDER));
    }
    Ok(content)
}
