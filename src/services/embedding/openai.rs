use async_trait::async_trait;

use crate::services::openai::OpenAiClient;

use super::{EmbeddingError, EmbeddingProvider};

/// Embeddings through the OpenAI `/embeddings` endpoint
pub struct OpenAiEmbeddingProvider {
    client: OpenAiClient,
}

impl OpenAiEmbeddingProvider {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        Ok(self.client.embed(text).await?)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.client.config().embedding_model
    }
}
