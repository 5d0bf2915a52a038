//! Turns an incident snapshot into summary markdown

mod cleanup;
mod document;
mod markdown;
mod prompt;

pub use cleanup::clean_note;
pub use document::IncidentDocument;
pub use markdown::normalize as normalize_markdown;
pub use prompt::{Prompt, load_system_prompt};

use crate::error::{RcaError, RcaResult};
use crate::incident::{Incident, IncidentEvent};
use crate::llm::CompletionClient;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Builds prompts and runs them through the completion client
#[derive(Clone)]
pub struct Summarizer {
    client: Arc<dyn CompletionClient>,
    system_prompt: Arc<str>,
    timeout: Duration,
}

impl Summarizer {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        system_prompt: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            system_prompt: Arc::from(system_prompt.into()),
            timeout,
        }
    }

    /// Deterministic prompt for an incident snapshot
    pub fn prompt_for(&self, incident: &Incident, events: &[IncidentEvent]) -> RcaResult<Prompt> {
        let document = IncidentDocument::build(incident, events);
        debug!(
            "Incident '{}' num events: {}",
            incident.incident_id,
            document.event_count()
        );
        Ok(Prompt {
            system: self.system_prompt.to_string(),
            document: document.to_json()?,
        })
    }

    /// Summarize one incident. Failures carry the incident's public id.
    pub async fn summarize(
        &self,
        incident: &Incident,
        events: &[IncidentEvent],
    ) -> RcaResult<String> {
        self.try_summarize(incident, events)
            .await
            .map_err(|e| RcaError::summarization(&incident.incident_id, e))
    }

    async fn try_summarize(
        &self,
        incident: &Incident,
        events: &[IncidentEvent],
    ) -> RcaResult<String> {
        let prompt = self.prompt_for(incident, events)?;
        info!(
            "Requesting LLM to summarize... prompt size: {} chars, context size: {} chars",
            prompt.system.chars().count(),
            prompt.document.chars().count()
        );

        let start = Instant::now();
        let text = tokio::time::timeout(self.timeout, self.client.complete(&prompt))
            .await
            .map_err(|_| {
                RcaError::timeout_with_context(self.timeout.as_secs(), "Waiting on LLM response")
            })??;

        if text.trim().is_empty() {
            return Err(RcaError::llm("LLM returned an empty summary"));
        }
        info!("Summary generated, {} bytes received", text.len());
        info!(
            "Summary successfully generated (time elapsed: {:.4} seconds)",
            start.elapsed().as_secs_f64()
        );

        Ok(normalize_markdown(&text))
    }
}
