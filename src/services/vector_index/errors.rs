use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index configuration error: {message}")]
    Configuration { message: String },

    #[error("Index request failed: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("Index network error: {source}")]
    Network { source: reqwest::Error },

    #[error("Index request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Index response parse error: {message}")]
    Parse { message: String },

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index not ready: {message}")]
    NotReady { message: String },
}

impl IndexError {
    pub fn from_reqwest_error(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            IndexError::Timeout { timeout_ms }
        } else {
            IndexError::Network { source: error }
        }
    }

    pub fn from_status_and_body(status: reqwest::StatusCode, body: &str) -> Self {
        // Control plane: {"error": {"code", "message"}}; data plane: {"code", "message"}
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .or_else(|| value.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.to_string());

        IndexError::Http {
            status: status.as_u16(),
            message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::Http { status: 404, .. })
    }
}
