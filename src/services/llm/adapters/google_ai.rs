//! Google AI adapter implementing LlmClient trait

use async_trait::async_trait;
use std::time::Duration;

use crate::services::google_ai::{
    GenerateContentRequest, GenerationConfig, GoogleAiClient, GoogleAiConfig,
};

use super::super::errors::LlmError;
use super::super::traits::LlmClient;
use super::super::types::{GenerateRequest, GenerateResponse, LlmConfig};

pub struct GoogleAiAdapter {
    client: GoogleAiClient,
    model_name: String,
}

impl GoogleAiAdapter {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let mut gai_config =
            GoogleAiConfig::new(config.api_key).with_timeout(Duration::from_secs(config.timeout_secs));

        if let Some(model) = config.model {
            gai_config = gai_config.with_model(model);
        }
        if let Some(base_url) = config.base_url {
            gai_config = gai_config.with_base_url(base_url);
        }

        let model_name = gai_config.model.clone();
        let client = GoogleAiClient::new(gai_config)?;

        Ok(Self { client, model_name })
    }

    pub fn from_client(client: GoogleAiClient) -> Self {
        let model_name = client.config().model.clone();
        Self { client, model_name }
    }
}

#[async_trait]
impl LlmClient for GoogleAiAdapter {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let mut gai_request = GenerateContentRequest::new(request.prompt).with_generation_config(
            GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                candidate_count: Some(1),
            },
        );
        if let Some(system_prompt) = request.system_prompt {
            gai_request = gai_request.with_system_instruction(system_prompt);
        }

        let response = self.client.generate_content(gai_request).await?;

        let text = response
            .extract_text()
            .ok_or_else(|| LlmError::InvalidResponse {
                message: "No text content in response".to_string(),
            })?;

        Ok(GenerateResponse {
            text,
            total_tokens: response.get_token_usage(),
            model_used: Some(self.model_name.clone()),
            finish_reason: response.get_finish_reason(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "google-ai"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        let request = GenerateContentRequest::new("ping".to_string()).with_generation_config(
            GenerationConfig {
                max_output_tokens: Some(1),
                ..Default::default()
            },
        );
        self.client.generate_content(request).await?;
        Ok(())
    }
}
