//! CLI argument definitions using clap
//!
//! - rcasum generate --id <ID>      # Summarize one incident to stdout
//! - rcasum worker                  # Refresh every stale summary

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rcasum")]
#[command(about = "AI-generated summaries for WebRCA incidents")]
#[command(version)]
pub struct Cli {
    /// System prompt file [default: prompt.txt, or $PROMPT_FILE]
    #[arg(long, global = true, value_name = "PATH")]
    pub prompt_file: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, env = "LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Generate summary for a single incident
    Generate {
        /// Incident public ID (example: ITN-2025-00096)
        #[arg(long)]
        id: String,
    },

    /// Generate summaries for all incidents and update WebRCA
    Worker {
        /// Summarize only if the incident changed less than DAYS days ago (0: no limit)
        #[arg(long, value_name = "DAYS")]
        since: Option<u32>,

        /// Incidents processed at once [default: $MAX_WORKERS or 3]
        #[arg(long, value_name = "N")]
        max_workers: Option<usize>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}
