//! Environment variable constants used throughout the application
//!
//! This module centralizes all environment variable names to ensure consistency
//! and make it easier to manage configuration across the codebase.

/// Logging configuration
pub mod logging {
    /// Log level configuration (e.g., "debug", "info", "warn", "error")
    pub const LOG_LEVEL: &str = "PANDA_LOG_LEVEL";

    /// Log file path for file-based logging
    pub const LOG_FILE: &str = "PANDA_LOG_FILE";

    /// Emit JSON-formatted log lines when set to "1" or "true"
    pub const LOG_JSON: &str = "PANDA_LOG_JSON";

    /// Disable colored output (follows the NO_COLOR standard)
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// External API credentials
pub mod apis {
    /// OpenAI API key (embeddings and chat completions)
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

    /// Google AI (Gemini) API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

    /// Pinecone API key for the semantic index
    pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";

    /// Pinecone region the serverless index lives in
    pub const PINECONE_ENVIRONMENT: &str = "PINECONE_ENVIRONMENT";
}

/// Strategy selection overrides
pub mod pipeline {
    /// Path of the configuration file (defaults to ~/.panda/config.toml)
    pub const CONFIG_PATH: &str = "PANDA_CONFIG";

    /// Index backend: "pinecone" | "memory" | "disabled"
    pub const INDEX_BACKEND: &str = "PANDA_INDEX_BACKEND";

    /// Embedding provider: "openai" | "local"
    pub const EMBEDDING_PROVIDER: &str = "PANDA_EMBEDDING_PROVIDER";

    /// Generative provider: "openai" | "google-ai"
    pub const LLM_PROVIDER: &str = "PANDA_LLM_PROVIDER";
}
