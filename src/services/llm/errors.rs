//! Provider-agnostic LLM errors wrapping the transport-level ones.

use thiserror::Error;

use crate::services::google_ai::GoogleAiError;
use crate::services::openai::OpenAiError;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded { message: String },

    #[error("Request timeout after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Content blocked: {message}")]
    ContentBlocked { message: String },

    #[error("Quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

impl LlmError {
    /// Short machine-friendly kind for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::ConfigurationError { .. } => "configuration",
            LlmError::AuthenticationFailed { .. } => "authentication",
            LlmError::RateLimitExceeded { .. } => "rate_limit",
            LlmError::Timeout { .. } => "timeout",
            LlmError::NetworkError { .. } => "network",
            LlmError::InvalidRequest { .. } => "invalid_request",
            LlmError::ContentBlocked { .. } => "content_blocked",
            LlmError::QuotaExceeded { .. } => "quota",
            LlmError::ServerError { .. } => "server",
            LlmError::ParseError { .. } => "parse",
            LlmError::InvalidResponse { .. } => "invalid_response",
        }
    }
}

impl From<GoogleAiError> for LlmError {
    fn from(err: GoogleAiError) -> Self {
        match err {
            GoogleAiError::AuthenticationFailed { message } => {
                LlmError::AuthenticationFailed { message }
            }
            GoogleAiError::RateLimitExceeded { message } => LlmError::RateLimitExceeded { message },
            GoogleAiError::Timeout { timeout_ms } => LlmError::Timeout {
                timeout_secs: timeout_ms / 1000,
            },
            GoogleAiError::NetworkError { source } => LlmError::NetworkError {
                message: source.to_string(),
            },
            GoogleAiError::InvalidRequest { message } => LlmError::InvalidRequest { message },
            GoogleAiError::ContentBlocked { message } => LlmError::ContentBlocked { message },
            GoogleAiError::QuotaExceeded { message } => LlmError::QuotaExceeded { message },
            GoogleAiError::ServerError { message, .. } => LlmError::ServerError { message },
            GoogleAiError::ParseError { message } => LlmError::ParseError { message },
            GoogleAiError::InvalidResponse { message } => LlmError::InvalidResponse { message },
            GoogleAiError::ConfigurationError { message } => {
                LlmError::ConfigurationError { message }
            }
        }
    }
}

impl From<OpenAiError> for LlmError {
    fn from(err: OpenAiError) -> Self {
        match err {
            OpenAiError::AuthenticationFailed { message } => {
                LlmError::AuthenticationFailed { message }
            }
            OpenAiError::RateLimitExceeded { message } => LlmError::RateLimitExceeded { message },
            OpenAiError::QuotaExceeded { message } => LlmError::QuotaExceeded { message },
            OpenAiError::Timeout { timeout_ms } => LlmError::Timeout {
                timeout_secs: timeout_ms / 1000,
            },
            OpenAiError::NetworkError { source } => LlmError::NetworkError {
                message: source.to_string(),
            },
            OpenAiError::InvalidRequest { message } => LlmError::InvalidRequest { message },
            OpenAiError::ServerError { message, .. } => LlmError::ServerError { message },
            OpenAiError::ParseError { message } => LlmError::ParseError { message },
            OpenAiError::InvalidResponse { message } => LlmError::InvalidResponse { message },
            OpenAiError::ConfigurationError { message } => {
                LlmError::ConfigurationError { message }
            }
        }
    }
}
