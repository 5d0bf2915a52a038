//! Single-incident summary printed to stdout

use crate::console::RcaConsole;
use rcasum_core::config::Config;
use rcasum_core::error::RcaResult;
use rcasum_core::incident::{IncidentSource, WebRcaClient};
use rcasum_core::llm::OpenAiClient;
use rcasum_core::summarizer::{Summarizer, load_system_prompt};
use std::sync::Arc;
use tracing::info;

fn waiting_message(bytes_received: usize) -> String {
    format!("Waiting on LLM response... (bytes received: {})", bytes_received)
}

/// Fetch one incident by public id, summarize it and print the markdown
pub async fn generate(config: &Config, public_id: &str) -> RcaResult<()> {
    let console = RcaConsole::new();
    let source = WebRcaClient::from_config(config)?;
    let system_prompt = load_system_prompt(&config.prompt_file)?;

    info!("Fetching incident '{}' from WebRCA...", public_id);
    let incident = source.get_incident(public_id).await?;
    info!("Fetching events for incident '{}' ...", incident.incident_id);
    let events = source.list_events(&incident.id).await?;

    let spinner = console.spinner(waiting_message(0));
    let progress = spinner.clone();
    let client = OpenAiClient::new(config.llm.clone())?.with_progress(Arc::new(move |bytes| {
        progress.set_message(waiting_message(bytes));
    }));
    let summarizer = Summarizer::new(Arc::new(client), system_prompt, config.llm.timeout);

    let result = summarizer.summarize(&incident, &events).await;
    spinner.finish_and_clear();
    let summary = result?;

    console.rule("AI-generated Summary");
    print!("{}", summary);
    Ok(())
}
