//! LLM client trait definition

use super::errors::LlmError;
use super::types::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;

/// Provider-agnostic trait for LLM text generation
///
/// Implementations make exactly one request per `generate` call. Callers in
/// this crate turn errors into fallback values instead of retrying.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate text completion from a prompt
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Get the provider name for logging and debugging
    fn provider_name(&self) -> &'static str;

    /// Get the model identifier being used
    fn model_name(&self) -> &str;

    /// Check if the client is properly configured and can make requests
    async fn health_check(&self) -> Result<(), LlmError>;
}
