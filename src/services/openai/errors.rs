use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded { message: String },

    #[error("Quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: {source}")]
    NetworkError { source: reqwest::Error },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl OpenAiError {
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, OpenAiError::AuthenticationFailed { .. })
    }

    pub fn is_rate_limit_error(&self) -> bool {
        matches!(self, OpenAiError::RateLimitExceeded { .. })
    }

    pub fn is_quota_error(&self) -> bool {
        matches!(self, OpenAiError::QuotaExceeded { .. })
    }

    pub fn from_reqwest_error(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            OpenAiError::Timeout { timeout_ms }
        } else {
            OpenAiError::NetworkError { source: error }
        }
    }

    pub fn from_status_and_body(status: reqwest::StatusCode, body: &str) -> Self {
        let status_code = status.as_u16();

        // {"error": {"message": ..., "type": ..., "code": ...}}
        let details = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("error").cloned());
        let error_message = details
            .as_ref()
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or(body)
            .to_string();
        let error_code = details
            .as_ref()
            .and_then(|e| e.get("code").or_else(|| e.get("type")))
            .and_then(|c| c.as_str())
            .unwrap_or_default()
            .to_string();

        match status_code {
            400 | 404 | 422 => OpenAiError::InvalidRequest {
                message: error_message,
            },
            401 => OpenAiError::AuthenticationFailed {
                message: error_message,
            },
            403 => {
                if error_message.to_lowercase().contains("quota") {
                    OpenAiError::QuotaExceeded {
                        message: error_message,
                    }
                } else {
                    OpenAiError::AuthenticationFailed {
                        message: error_message,
                    }
                }
            }
            429 => {
                if error_code == "insufficient_quota" {
                    OpenAiError::QuotaExceeded {
                        message: error_message,
                    }
                } else {
                    OpenAiError::RateLimitExceeded {
                        message: error_message,
                    }
                }
            }
            500..=599 => OpenAiError::ServerError {
                status: status_code,
                message: error_message,
            },
            _ => OpenAiError::InvalidRequest {
                message: format!("HTTP {status_code}: {error_message}"),
            },
        }
    }
}
