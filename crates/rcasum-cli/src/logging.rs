//! tracing subscriber setup

use crate::args::LogFormat;
use std::env;
use tracing_subscriber::EnvFilter;

/// HTTP crates that log every connection at debug level
const QUIET_CRATES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

/// Install the global subscriber. Logs go to stderr so stdout carries only summaries.
pub fn init(default_level: &str, format: LogFormat) {
    let directives = filter_directives(env::var("RUST_LOG").ok(), default_level);
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("invalid log filter '{}': {}, falling back to info", directives, e);
        EnvFilter::new(filter_directives(None, "info"))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// `RUST_LOG` wins verbatim; otherwise the level with noisy HTTP crates capped at warn
fn filter_directives(rust_log: Option<String>, level: &str) -> String {
    match rust_log.filter(|v| !v.trim().is_empty()) {
        Some(directives) => directives,
        None => {
            let mut directives = vec![level.to_string()];
            directives.extend(QUIET_CRATES.iter().map(|c| format!("{}=warn", c)));
            directives.join(",")
        }
    }
}
