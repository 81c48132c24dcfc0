use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoogleAiError {
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: {source}")]
    NetworkError { source: reqwest::Error },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Content blocked: {message}")]
    ContentBlocked { message: String },

    #[error("Quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl GoogleAiError {
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, GoogleAiError::AuthenticationFailed { .. })
    }

    pub fn is_rate_limit_error(&self) -> bool {
        matches!(self, GoogleAiError::RateLimitExceeded { .. })
    }

    pub fn is_quota_error(&self) -> bool {
        matches!(self, GoogleAiError::QuotaExceeded { .. })
    }

    pub fn from_reqwest_error(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            GoogleAiError::Timeout { timeout_ms }
        } else {
            GoogleAiError::NetworkError { source: error }
        }
    }

    pub fn from_status_and_body(status: reqwest::StatusCode, body: &str) -> Self {
        let status_code = status.as_u16();

        // Gemini wraps details as {"error": {"message": ...}}
        let error_message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.to_string());

        match status_code {
            400 => GoogleAiError::InvalidRequest {
                message: error_message,
            },
            401 => GoogleAiError::AuthenticationFailed {
                message: error_message,
            },
            403 => {
                if error_message.to_lowercase().contains("quota") {
                    GoogleAiError::QuotaExceeded {
                        message: error_message,
                    }
                } else {
                    GoogleAiError::AuthenticationFailed {
                        message: error_message,
                    }
                }
            }
            429 => GoogleAiError::RateLimitExceeded {
                message: error_message,
            },
            500..=599 => GoogleAiError::ServerError {
                status: status_code,
                message: error_message,
            },
            _ => GoogleAiError::InvalidRequest {
                message: format!("HTTP {status_code}: {error_message}"),
            },
        }
    }
}
