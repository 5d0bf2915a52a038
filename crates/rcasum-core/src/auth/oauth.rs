//! OpenID Connect token endpoint client
//!
//! Supports:
//! - `refresh_token` grant with an offline token
//! - `client_credentials` grant

use super::token::TokenInfo;
use crate::config::{SsoConfig, timeouts};
use crate::error::sanitize_error_text;
use serde::Deserialize;
use tracing::debug;

/// Token endpoint configuration
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Token endpoint URL
    pub token_endpoint: String,
    /// Client ID
    pub client_id: String,
    /// Client secret (optional for public clients)
    pub client_secret: Option<String>,
}

impl OAuthConfig {
    /// Create new OAuth config
    pub fn new(token_endpoint: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            token_endpoint: token_endpoint.into(),
            client_id: client_id.into(),
            client_secret: None,
        }
    }

    /// Set client secret
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }
}

impl From<&SsoConfig> for OAuthConfig {
    fn from(sso: &SsoConfig) -> Self {
        let config = Self::new(sso.token_endpoint(), sso.client_id.clone());
        match &sso.client_secret {
            Some(secret) => config.with_secret(secret.clone()),
            None => config,
        }
    }
}

/// OpenID Connect token client
pub struct OAuthClient {
    config: OAuthConfig,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Create new OAuth client
    pub fn new(config: OAuthConfig) -> Result<Self, OAuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeouts::sso::token_timeout())
            .build()
            .map_err(|e| OAuthError::NetworkError(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Exchange an offline token for a fresh access token
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenInfo, OAuthError> {
        let mut params = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
        ];
        if let Some(secret) = &self.config.client_secret {
            params.push(("client_secret", secret.as_str()));
        }
        self.request_token(&params).await
    }

    /// Obtain an access token with the client credentials grant
    pub async fn client_credentials(&self) -> Result<TokenInfo, OAuthError> {
        let secret = self
            .config
            .client_secret
            .as_deref()
            .ok_or(OAuthError::MissingCredentials)?;
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", secret),
        ];
        self.request_token(&params).await
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<TokenInfo, OAuthError> {
        debug!("Requesting SSO token from {}", self.config.token_endpoint);

        let response = self
            .http_client
            .post(&self.config.token_endpoint)
            .form(params)
            .send()
            .await
            .map_err(|e| OAuthError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(OAuthError::TokenError(format!(
                "status {}: {}",
                status,
                sanitize_error_text(&error_body)
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| OAuthError::ParseError(e.to_string()))?;

        Ok(TokenInfo {
            access_token: token_response.access_token,
            token_type: token_response.token_type,
            expires_in: token_response.expires_in,
            issued_at: chrono::Utc::now(),
        })
    }
}

/// Token response from the SSO server
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// OAuth errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum OAuthError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("need SSO_CLIENT_ID/SSO_CLIENT_SECRET or SSO_OFFLINE_TOKEN defined")]
    MissingCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_sso() {
        let sso = SsoConfig {
            client_secret: Some("s3cret".into()),
            ..SsoConfig::default()
        };
        let config = OAuthConfig::from(&sso);
        assert_eq!(config.client_id, "cloud-services");
        assert_eq!(config.client_secret.as_deref(), Some("s3cret"));
        assert!(config.token_endpoint.ends_with("/protocol/openid-connect/token"));
    }

    #[tokio::test]
    async fn test_client_credentials_requires_secret() {
        let client = OAuthClient::new(OAuthConfig::new("http://127.0.0.1:9/token", "id")).unwrap();
        let err = client.client_credentials().await.unwrap_err();
        assert!(matches!(err, OAuthError::MissingCredentials));
    }

    #[test]
    fn test_token_response_defaults() {
        let parsed: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(parsed.token_type, "Bearer");
        assert!(parsed.expires_in.is_none());
    }
}
