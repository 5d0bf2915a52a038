//! Access token caching
//!
//! Tokens are shared by every concurrent request of a run; a single async
//! lock guarantees at most one refresh is in flight.

use super::oauth::{OAuthClient, OAuthConfig};
use crate::config::{SsoConfig, timeouts};
use crate::error::RcaResult;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Token information
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// Access token
    pub access_token: String,
    /// Token type (usually "Bearer")
    pub token_type: String,
    /// Expiration time in seconds
    pub expires_in: Option<u64>,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
}

impl TokenInfo {
    /// Check if the token is expired (or about to be)
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expiry check against an explicit clock
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_in {
            Some(expires_in) => {
                let expiry = self.issued_at + chrono::Duration::seconds(expires_in as i64);
                now >= expiry - chrono::Duration::seconds(timeouts::sso::EXPIRY_MARGIN_SECS)
            }
            None => false,
        }
    }

    /// Get remaining lifetime in seconds
    pub fn remaining_lifetime(&self) -> Option<i64> {
        self.expires_in.map(|expires_in| {
            let expiry = self.issued_at + chrono::Duration::seconds(expires_in as i64);
            (expiry - Utc::now()).num_seconds()
        })
    }
}

enum TokenSource {
    Static(String),
    Sso {
        client: OAuthClient,
        offline_token: Option<String>,
        cached: Mutex<Option<TokenInfo>>,
    },
}

/// Supplies bearer tokens for the incident API
pub struct TokenManager {
    source: TokenSource,
}

impl TokenManager {
    /// Always hand out the given token
    pub fn fixed(token: impl Into<String>) -> Self {
        Self {
            source: TokenSource::Static(token.into()),
        }
    }

    /// Mint tokens from the SSO server; a static token wins when present.
    ///
    /// Credentials are checked when the first token is requested.
    pub fn new(static_token: Option<String>, sso: &SsoConfig) -> RcaResult<Self> {
        if let Some(token) = static_token {
            debug!("Using static WEBRCA_TOKEN for incident API");
            return Ok(Self::fixed(token));
        }
        let client = OAuthClient::new(OAuthConfig::from(sso))?;
        Ok(Self {
            source: TokenSource::Sso {
                client,
                offline_token: sso.offline_token.clone(),
                cached: Mutex::new(None),
            },
        })
    }

    /// Current access token, refreshing it when missing or near expiry
    pub async fn access_token(&self) -> RcaResult<String> {
        match &self.source {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Sso {
                client,
                offline_token,
                cached,
            } => {
                let mut guard = cached.lock().await;
                if let Some(token) = guard.as_ref().filter(|t| !t.is_expired()) {
                    return Ok(token.access_token.clone());
                }

                let token = match offline_token {
                    Some(offline) => client.refresh_token(offline).await?,
                    None => client.client_credentials().await?,
                };
                info!(
                    expires_in = token.expires_in.unwrap_or_default(),
                    "obtained new SSO access token"
                );
                let access = token.access_token.clone();
                *guard = Some(token);
                Ok(access)
            }
        }
    }
}
