//! Typed configuration structures

use crate::config::timeouts;
use crate::error::{RcaError, RcaResult};
use crate::incident::StatusType;
use std::path::PathBuf;
use std::time::Duration;

/// Default WebRCA v1 API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.openshift.com/api/web-rca/v1";
/// Default SSO server
pub const DEFAULT_SSO_AUTH_URL: &str = "https://sso.redhat.com/auth/";
/// Default SSO realm
pub const DEFAULT_SSO_REALM: &str = "redhat-external";
/// Default SSO client id
pub const DEFAULT_SSO_CLIENT_ID: &str = "cloud-services";
/// Default OpenAI-compatible endpoint
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
/// Default completion model
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
/// Default refresh pool size
pub const DEFAULT_MAX_WORKERS: usize = 3;
/// Default system prompt location
pub const DEFAULT_PROMPT_FILE: &str = "prompt.txt";

/// Incident store connection settings
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// API base URL without trailing slash
    pub base_url: String,
    /// Static bearer token; bypasses SSO when set
    pub static_token: Option<String>,
    /// Per-request deadline
    pub request_timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            static_token: None,
            request_timeout: timeouts::source::request_timeout(),
        }
    }
}

/// SSO (OpenID Connect) settings used to mint incident API tokens
#[derive(Debug, Clone)]
pub struct SsoConfig {
    pub auth_url: String,
    pub realm: String,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub offline_token: Option<String>,
}

impl Default for SsoConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_SSO_AUTH_URL.to_string(),
            realm: DEFAULT_SSO_REALM.to_string(),
            client_id: DEFAULT_SSO_CLIENT_ID.to_string(),
            client_secret: None,
            offline_token: None,
        }
    }
}

impl SsoConfig {
    /// OpenID Connect token endpoint for the configured realm
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.auth_url.trim_end_matches('/'),
            self.realm
        )
    }
}

/// LLM completion endpoint settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Deadline for a single completion call
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            timeout: timeouts::llm::completion_timeout(),
        }
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Log filter used when RUST_LOG is unset
    pub log_level: String,
    /// Upper bound on concurrently refreshed incidents
    pub max_workers: usize,
    /// Incident statuses included in the worker scan
    pub statuses: Vec<StatusType>,
    /// System prompt file
    pub prompt_file: PathBuf,
    pub source: SourceConfig,
    pub sso: SsoConfig,
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_workers: DEFAULT_MAX_WORKERS,
            statuses: StatusType::all().to_vec(),
            prompt_file: PathBuf::from(DEFAULT_PROMPT_FILE),
            source: SourceConfig::default(),
            sso: SsoConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Check invariants that cannot be expressed in the types
    pub fn validate(&self) -> RcaResult<()> {
        if self.max_workers == 0 {
            return Err(RcaError::config_with_context(
                "MAX_WORKERS must be at least 1",
                "Validating worker pool size",
            ));
        }
        if self.statuses.is_empty() {
            return Err(RcaError::config("STATUS_TYPES must name at least one status"));
        }
        if self.source.base_url.is_empty() {
            return Err(RcaError::config("WEBRCA_V1_API_BASE_URL must not be empty"));
        }
        Ok(())
    }

    /// Comma-separated status filter as sent to the incident API
    pub fn status_param(&self) -> String {
        self.statuses
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}
