//! Configuration management for rcasum
//!
//! A [`Config`] is built once per invocation from the environment (with an
//! optional `.env` file) and handed to the clients and the refresh worker.
//! Nothing here is global.

#[allow(clippy::module_inception)] // config module in config directory is intentional
mod config;
mod env_loader;
pub mod timeouts;

pub use config::{
    Config, DEFAULT_MAX_WORKERS, DEFAULT_PROMPT_FILE, LlmConfig, SourceConfig, SsoConfig,
};
pub use env_loader::{load_from_env, load_from_lookup, parse_status_types};
