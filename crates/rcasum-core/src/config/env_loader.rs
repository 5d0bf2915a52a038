//! Environment variable-based configuration loading

use crate::config::config::Config;
use crate::error::{RcaError, RcaResult};
use crate::incident::StatusType;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Load configuration from the process environment.
///
/// A `.env` file in the working directory is read first when present;
/// variables already set in the environment win.
pub fn load_from_env() -> RcaResult<Config> {
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => {
            return Err(RcaError::config_with_context(
                format!("Failed to read .env file: {}", e),
                "Loading environment",
            ));
        }
    }
    load_from_lookup(|key| env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_from_lookup<F>(lookup: F) -> RcaResult<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut config = Config::default();

    if let Some(level) = get("LOG_LEVEL") {
        config.log_level = level.to_lowercase();
    }
    if let Some(workers) = get("MAX_WORKERS") {
        config.max_workers = parse_var("MAX_WORKERS", &workers)?;
    }
    if let Some(statuses) = get("STATUS_TYPES") {
        config.statuses = parse_status_types(&statuses)?;
    }
    if let Some(prompt_file) = get("PROMPT_FILE") {
        config.prompt_file = PathBuf::from(prompt_file);
    }

    // Incident store
    if let Some(base_url) = get("WEBRCA_V1_API_BASE_URL") {
        config.source.base_url = base_url.trim_end_matches('/').to_string();
    }
    config.source.static_token = get("WEBRCA_TOKEN");
    if let Some(secs) = get("HTTP_TIMEOUT_SECS") {
        config.source.request_timeout =
            Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", &secs)?);
    }

    // SSO
    if let Some(url) = get("SSO_AUTH_URL") {
        config.sso.auth_url = url;
    }
    if let Some(realm) = get("SSO_REALM_NAME") {
        config.sso.realm = realm;
    }
    if let Some(client_id) = get("SSO_CLIENT_ID") {
        config.sso.client_id = client_id;
    }
    config.sso.client_secret = get("SSO_CLIENT_SECRET");
    config.sso.offline_token = get("SSO_OFFLINE_TOKEN");

    // LLM
    if let Some(base_url) = get("LLM_BASE_URL") {
        config.llm.base_url = base_url.trim_end_matches('/').to_string();
    }
    config.llm.api_key = get("LLM_API_KEY");
    if let Some(model) = get("LLM_MODEL") {
        config.llm.model = model;
    }
    if let Some(temp) = get("LLM_TEMPERATURE") {
        config.llm.temperature = Some(parse_var("LLM_TEMPERATURE", &temp)?);
    }
    if let Some(max_tokens) = get("LLM_MAX_TOKENS") {
        config.llm.max_tokens = Some(parse_var("LLM_MAX_TOKENS", &max_tokens)?);
    }
    if let Some(secs) = get("LLM_TIMEOUT_SECS") {
        config.llm.timeout = Duration::from_secs(parse_var("LLM_TIMEOUT_SECS", &secs)?);
    }

    Ok(config)
}

/// Parse a comma-separated status list, normalizing to lowercase.
pub fn parse_status_types(raw: &str) -> RcaResult<Vec<StatusType>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(StatusType::from_str)
        .collect()
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> RcaResult<T> {
    value.trim().parse().map_err(|_| {
        RcaError::config_with_context(
            format!("Invalid {} value", name),
            format!("Parsing '{}'", value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load_from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.max_workers, 3);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.statuses.len(), 5);
        assert!(config.source.static_token.is_none());
        assert_eq!(config.prompt_file, PathBuf::from("prompt.txt"));
    }

    #[test]
    fn test_overrides() {
        let config = load_from_lookup(lookup(&[
            ("MAX_WORKERS", "8"),
            ("LOG_LEVEL", "DEBUG"),
            ("WEBRCA_V1_API_BASE_URL", "https://rca.example.test/api/v1/"),
            ("WEBRCA_TOKEN", "static"),
            ("LLM_MODEL", "granite"),
            ("LLM_TEMPERATURE", "0.2"),
            ("LLM_TIMEOUT_SECS", "45"),
        ]))
        .unwrap();

        assert_eq!(config.max_workers, 8);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.source.base_url, "https://rca.example.test/api/v1");
        assert_eq!(config.source.static_token.as_deref(), Some("static"));
        assert_eq!(config.llm.model, "granite");
        assert_eq!(config.llm.temperature, Some(0.2));
        assert_eq!(config.llm.timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_invalid_worker_count() {
        let err = load_from_lookup(lookup(&[("MAX_WORKERS", "many")])).unwrap_err();
        assert!(err.to_string().contains("MAX_WORKERS"));
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let config = load_from_lookup(lookup(&[("SSO_CLIENT_SECRET", "  ")])).unwrap();
        assert!(config.sso.client_secret.is_none());
    }

    #[test]
    fn test_status_types_normalized() {
        let statuses = parse_status_types("New, ONGOING,resolved").unwrap();
        assert_eq!(
            statuses,
            vec![StatusType::New, StatusType::Ongoing, StatusType::Resolved]
        );
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = parse_status_types("new,archived").unwrap_err();
        assert!(err.to_string().contains("archived"));
    }
}
