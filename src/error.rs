use thiserror::Error;

/// Crate-level errors for configuration, construction and the CLI.
///
/// The retrieval pipeline itself never returns these: provider and index
/// failures are absorbed into degraded results at the call site.
#[derive(Error, Debug)]
pub enum PandaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl PandaError {
    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a provider construction error
    pub fn provider<S: Into<String>>(provider: S, message: S) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            PandaError::Io(_) => "io",
            PandaError::Json(_) => "json",
            PandaError::ConfigParse(_) | PandaError::ConfigSerialize(_) => "config",
            PandaError::InvalidConfig { .. } => "config",
            PandaError::Provider { .. } => "provider",
            PandaError::TaskJoin(_) => "task",
            PandaError::Validation { .. } => "validation",
            PandaError::Unknown { .. } => "unknown",
        }
    }
}

impl From<anyhow::Error> for PandaError {
    fn from(err: anyhow::Error) -> Self {
        PandaError::Unknown {
            message: err.to_string(),
        }
    }
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, PandaError>;
