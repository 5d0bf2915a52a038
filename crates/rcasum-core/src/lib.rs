//! rcasum core library
//!
//! Fetches incidents from WebRCA, summarizes them with an LLM and writes the
//! summaries back. The [`worker::RefreshWorker`] only touches incidents whose
//! summary is older than their last change, with bounded concurrency.

pub mod auth;
pub mod config;
pub mod error;
pub mod incident;
pub mod llm;
pub mod staleness;
pub mod summarizer;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use error::{RcaError, RcaResult, UnifiedError};
pub use incident::{Incident, IncidentEvent, IncidentSource, WebRcaClient};
pub use llm::{CompletionClient, OpenAiClient};
pub use staleness::needs_refresh;
pub use summarizer::{Prompt, Summarizer};
pub use worker::{RefreshWorker, RunReport, WorkerOptions};
