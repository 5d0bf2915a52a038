//! Centralized timeout configuration
//!
//! Default deadlines for remote calls. Every value can be overridden through
//! the environment; no call is retried by default.

use std::time::Duration;

/// Default timeout values for incident store requests
pub mod source {
    use super::*;

    /// Default timeout for incident API requests (30 seconds)
    pub const REQUEST_SECS: u64 = 30;

    /// Get request timeout as Duration
    pub fn request_timeout() -> Duration {
        Duration::from_secs(REQUEST_SECS)
    }
}

/// Default timeout values for LLM operations
pub mod llm {
    use super::*;

    /// Default connection timeout for LLM APIs (30 seconds)
    pub const CONNECTION_SECS: u64 = 30;

    /// Default deadline for one completion (5 minutes)
    pub const COMPLETION_SECS: u64 = 300;

    /// Get connection timeout as Duration
    pub fn connection_timeout() -> Duration {
        Duration::from_secs(CONNECTION_SECS)
    }

    /// Get completion timeout as Duration
    pub fn completion_timeout() -> Duration {
        Duration::from_secs(COMPLETION_SECS)
    }
}

/// Default timeout values for SSO token exchange
pub mod sso {
    use super::*;

    /// Default timeout for token requests (15 seconds)
    pub const TOKEN_SECS: u64 = 15;

    /// Seconds before real expiry at which a token is considered stale
    pub const EXPIRY_MARGIN_SECS: i64 = 30;

    /// Get token request timeout as Duration
    pub fn token_timeout() -> Duration {
        Duration::from_secs(TOKEN_SECS)
    }
}
