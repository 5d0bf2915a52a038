//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use rcasum_core::config::{Config, load_from_env};
use rcasum_core::error::RcaResult;

/// Environment configuration with command-line overrides applied
pub fn load_config(cli: &Cli) -> RcaResult<Config> {
    let mut config = load_from_env()?;
    apply_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(prompt_file) = &cli.prompt_file {
        config.prompt_file = prompt_file.clone();
    }
    if let Commands::Worker {
        max_workers: Some(max_workers),
        ..
    } = cli.command
    {
        config.max_workers = max_workers;
    }
}

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: Config) -> RcaResult<()> {
    match cli.command {
        Commands::Generate { id } => commands::generate(&config, &id).await,
        Commands::Worker { since, .. } => commands::worker(&config, since).await,
    }
}
