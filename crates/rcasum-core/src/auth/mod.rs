//! Authentication for the incident API
//!
//! Provides:
//! - OpenID Connect token exchange (offline refresh token or client credentials)
//! - Cached access tokens with early expiry
//! - Static token override

mod oauth;
mod token;

pub use oauth::{OAuthClient, OAuthConfig, OAuthError};
pub use token::{TokenInfo, TokenManager};
