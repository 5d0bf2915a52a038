//! From trait implementations for RcaError conversions

use super::types::RcaError;
use crate::auth::OAuthError;

impl From<serde_json::Error> for RcaError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<reqwest::Error> for RcaError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::SourceUnavailable {
            message: error.to_string(),
            url,
            status_code,
            context: None,
        }
    }
}

impl From<OAuthError> for RcaError {
    fn from(error: OAuthError) -> Self {
        match error {
            OAuthError::MissingCredentials => Self::config_with_context(
                error.to_string(),
                "Resolving SSO credentials",
            ),
            other => Self::Auth {
                message: other.to_string(),
                context: Some("Exchanging SSO token".to_string()),
            },
        }
    }
}
