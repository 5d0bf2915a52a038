//! UnifiedError trait implementation for RcaError

use super::types::{RcaError, UnifiedError};

impl UnifiedError for RcaError {
    fn error_code(&self) -> &str {
        match self {
            Self::Config { .. } => "RCA_CONFIG",
            Self::SourceUnavailable { .. } => "RCA_SOURCE_UNAVAILABLE",
            Self::NotFound { .. } => "RCA_NOT_FOUND",
            Self::Llm { .. } => "RCA_LLM",
            Self::Summarization { .. } => "RCA_SUMMARIZATION",
            Self::Auth { .. } => "RCA_AUTH",
            Self::Timeout { .. } => "RCA_TIMEOUT",
            Self::Io { .. } => "RCA_IO",
            Self::Json { .. } => "RCA_JSON",
            Self::InvalidInput { .. } => "RCA_INVALID_INPUT",
            Self::Other { .. } => "RCA_OTHER",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Config { message, .. } => message,
            Self::SourceUnavailable { message, .. } => message,
            Self::NotFound { message, .. } => message,
            Self::Llm { message, .. } => message,
            Self::Summarization { source, .. } => source.message(),
            Self::Auth { message, .. } => message,
            Self::Timeout { .. } => "Operation timed out",
            Self::Io { message, .. } => message,
            Self::Json { message, .. } => message,
            Self::InvalidInput { message, .. } => message,
            Self::Other { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            Self::SourceUnavailable { context, .. } => context.as_deref(),
            Self::NotFound { context, .. } => context.as_deref(),
            Self::Llm { context, .. } => context.as_deref(),
            Self::Summarization { source, .. } => source.context(),
            Self::Auth { context, .. } => context.as_deref(),
            Self::Timeout { context, .. } => context.as_deref(),
            Self::Io { context, .. } => context.as_deref(),
            Self::Json { context, .. } => context.as_deref(),
            Self::InvalidInput { context, .. } => context.as_deref(),
            Self::Other { context, .. } => context.as_deref(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::SourceUnavailable { status_code, .. } => {
                !matches!(status_code, Some(400..=499))
            }
            Self::Llm { status_code, .. } => {
                matches!(status_code, None | Some(429) | Some(500..=599))
            }
            Self::Timeout { .. } | Self::Auth { .. } => true,
            Self::Summarization { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}
