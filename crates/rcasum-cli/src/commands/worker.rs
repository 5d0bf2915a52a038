//! One refresh pass over every incident

use crate::console::RcaConsole;
use rcasum_core::config::Config;
use rcasum_core::error::RcaResult;
use rcasum_core::incident::WebRcaClient;
use rcasum_core::llm::OpenAiClient;
use rcasum_core::summarizer::{Summarizer, load_system_prompt};
use rcasum_core::worker::{RefreshWorker, WorkerOptions};
use std::sync::Arc;

/// Refresh stale summaries. Per-incident failures are reported, not returned.
pub async fn worker(config: &Config, since_days: Option<u32>) -> RcaResult<()> {
    let console = RcaConsole::new();
    let source = Arc::new(WebRcaClient::from_config(config)?);
    let system_prompt = load_system_prompt(&config.prompt_file)?;
    let client = OpenAiClient::new(config.llm.clone())?;
    let summarizer = Summarizer::new(Arc::new(client), system_prompt, config.llm.timeout);

    let mut options = WorkerOptions::from_config(config);
    if let Some(days) = since_days {
        options = options.with_since_days(days);
    }

    let report = RefreshWorker::new(source, summarizer, options).run().await?;
    console.print_report(&report);
    Ok(())
}
