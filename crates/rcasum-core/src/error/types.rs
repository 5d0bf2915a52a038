//! Core error types and traits for rcasum

use thiserror::Error;

/// Result type alias for rcasum operations
pub type RcaResult<T> = Result<T, RcaError>;

/// Unified error trait implemented by [`RcaError`].
///
/// - error_code(): Unique code for programmatic error identification
/// - message(): Human-readable error message
/// - context(): Optional additional context
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is likely transient
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Main error type for rcasum
#[derive(Error, Debug, Clone)]
pub enum RcaError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Incident store could not be reached or rejected the request
    #[error("Incident source unavailable: {message}")]
    SourceUnavailable {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
        context: Option<String>,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        resource_type: Option<String>,
        context: Option<String>,
    },

    /// LLM completion errors
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        provider: Option<String>,
        status_code: Option<u16>,
        context: Option<String>,
    },

    /// Summarization of a specific incident failed
    #[error("Summarization failed for incident {incident_id}: {source}")]
    Summarization {
        incident_id: String,
        #[source]
        source: Box<RcaError>,
    },

    /// SSO token exchange errors
    #[error("Authentication error: {message}")]
    Auth {
        message: String,
        context: Option<String>,
    },

    /// Operation exceeded its deadline
    #[error("Operation timed out after {seconds} seconds")]
    Timeout {
        seconds: u64,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
        context: Option<String>,
    },

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}

impl RcaError {
    /// Incident id this error is attributed to, if any
    pub fn incident_id(&self) -> Option<&str> {
        match self {
            Self::Summarization { incident_id, .. } => Some(incident_id),
            _ => None,
        }
    }

    /// Innermost cause, unwrapping summarization wrappers
    pub fn root_cause(&self) -> &RcaError {
        match self {
            Self::Summarization { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
