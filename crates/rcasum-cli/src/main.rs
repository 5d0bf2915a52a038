//! rcasum command-line interface
//!
//! Generates AI summaries for WebRCA incidents.
//!
//! # Modes
//!
//! ## generate
//! Summarize a single incident and print the markdown to stdout. Nothing is
//! written back.
//!
//! - **Command:** `rcasum generate --id ITN-2025-00096`
//!
//! ## worker
//! Scan every incident, summarize the ones whose summary is older than their
//! last change and write the new summaries back. Meant to be run on a
//! schedule; each invocation is one pass.
//!
//! - **Command:** `rcasum worker [--since DAYS] [--max-workers N]`
//!
//! Configuration comes from environment variables (and `.env`). Set
//! `RUST_LOG` or `LOG_LEVEL` to change verbosity.

mod args;
mod commands;
mod console;
mod logging;
mod router;

use args::Cli;
use clap::Parser;
use rcasum_core::error::RcaResult;

#[tokio::main]
async fn main() -> RcaResult<()> {
    let cli = Cli::parse();
    let config = router::load_config(&cli)?;
    logging::init(&config.log_level, cli.log_format);

    router::route(cli, config).await
}
