//! OpenAI adapter implementing LlmClient trait

use async_trait::async_trait;
use std::time::Duration;

use crate::services::openai::{ChatCompletionRequest, ChatMessage, OpenAiClient, OpenAiConfig};

use super::super::errors::LlmError;
use super::super::traits::LlmClient;
use super::super::types::{GenerateRequest, GenerateResponse, LlmConfig};

pub struct OpenAiAdapter {
    client: OpenAiClient,
    model_name: String,
}

impl OpenAiAdapter {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let mut oai_config =
            OpenAiConfig::new(config.api_key).with_timeout(Duration::from_secs(config.timeout_secs));

        if let Some(model) = config.model {
            oai_config = oai_config.with_chat_model(model);
        }
        if let Some(base_url) = config.base_url {
            oai_config = oai_config.with_base_url(base_url);
        }

        let model_name = oai_config.chat_model.clone();
        let client = OpenAiClient::new(oai_config)?;

        Ok(Self { client, model_name })
    }

    /// Share an existing client, e.g. the one the embedding provider uses
    pub fn from_client(client: OpenAiClient) -> Self {
        let model_name = client.config().chat_model.clone();
        Self { client, model_name }
    }

    fn chat_request(&self, request: GenerateRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = request.system_prompt {
            messages.push(ChatMessage::system(system_prompt));
        }
        messages.push(ChatMessage::user(request.prompt));

        ChatCompletionRequest {
            model: self.model_name.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiAdapter {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let response = self.client.chat_completion(self.chat_request(request)).await?;

        let text = response
            .extract_text()
            .ok_or_else(|| LlmError::InvalidResponse {
                message: "No text content in response".to_string(),
            })?;

        Ok(GenerateResponse {
            text,
            total_tokens: response.get_token_usage(),
            model_used: response.model.clone().or_else(|| Some(self.model_name.clone())),
            finish_reason: response.get_finish_reason(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        let request = GenerateRequest::new("ping".to_string()).with_max_tokens(1);
        self.client.chat_completion(self.chat_request(request)).await?;
        Ok(())
    }
}
