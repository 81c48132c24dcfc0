use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use super::errors::OpenAiError;
use super::models::{
    ChatCompletionRequest, ChatCompletionResponse, EmbeddingRequest, EmbeddingResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub timeout: Duration,
    pub max_concurrent_requests: usize,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: crate::config::DEFAULT_OPENAI_CHAT_MODEL.to_string(),
            embedding_model: crate::config::DEFAULT_EMBEDDING_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            max_concurrent_requests: 15,
        }
    }
}

impl OpenAiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            ..Default::default()
        }
    }

    pub fn with_chat_model(mut self, model: String) -> Self {
        self.chat_model = model;
        self
    }

    pub fn with_embedding_model(mut self, model: String) -> Self {
        self.embedding_model = model;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Client settings from application config; `None` without an API key
    pub fn from_app_config(config: &crate::config::Config) -> Option<Self> {
        let api_key = config.api.openai_api_key.clone().filter(|key| !key.is_empty())?;
        Some(
            Self::new(api_key)
                .with_chat_model(config.generation.openai_model.clone())
                .with_embedding_model(config.embedding.model.clone())
                .with_timeout(Duration::from_secs(config.generation.timeout_secs)),
        )
    }

    pub fn validate(&self) -> Result<(), OpenAiError> {
        if self.api_key.is_empty() {
            return Err(OpenAiError::ConfigurationError {
                message: "OpenAI API key is required".to_string(),
            });
        }

        if self.base_url.is_empty() {
            return Err(OpenAiError::ConfigurationError {
                message: "Base URL cannot be empty".to_string(),
            });
        }

        if self.max_concurrent_requests == 0 {
            return Err(OpenAiError::ConfigurationError {
                message: "At least one concurrent request must be allowed".to_string(),
            });
        }

        Ok(())
    }
}

/// Client for the OpenAI chat completions and embeddings endpoints.
///
/// Cloning shares the HTTP connection pool and the concurrency limit.
#[derive(Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
    rate_limiter: Arc<Semaphore>,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, OpenAiError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OpenAiError::ConfigurationError {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        let rate_limiter = Arc::new(Semaphore::new(config.max_concurrent_requests));

        Ok(Self {
            config,
            client,
            rate_limiter,
        })
    }

    pub async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiError> {
        let response: ChatCompletionResponse = self.post_json("chat/completions", &request).await?;

        if response.choices.is_empty() {
            return Err(OpenAiError::InvalidResponse {
                message: "No choices in response".to_string(),
            });
        }

        Ok(response)
    }

    /// Embed a single input with the configured embedding model
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, OpenAiError> {
        let request = EmbeddingRequest {
            input: input.to_string(),
            model: self.config.embedding_model.clone(),
        };

        let response: EmbeddingResponse = self.post_json("embeddings", &request).await?;

        response
            .into_first_vector()
            .ok_or_else(|| OpenAiError::InvalidResponse {
                message: "No embedding data in response".to_string(),
            })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, OpenAiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let timeout_ms = self.config.timeout.as_millis() as u64;

        let _permit =
            self.rate_limiter
                .acquire()
                .await
                .map_err(|_| OpenAiError::RateLimitExceeded {
                    message: "Rate limiter closed".to_string(),
                })?;

        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);

        let response = timeout(
            self.config.timeout,
            self.client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(body)
                .send(),
        )
        .await
        .map_err(|_| OpenAiError::Timeout { timeout_ms })?
        .map_err(|e| OpenAiError::from_reqwest_error(e, timeout_ms))?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, OpenAiError> {
        let status = response.status();
        let timeout_ms = self.config.timeout.as_millis() as u64;

        if status.is_success() {
            let response_text = response
                .text()
                .await
                .map_err(|e| OpenAiError::from_reqwest_error(e, timeout_ms))?;

            serde_json::from_str(&response_text).map_err(|e| OpenAiError::ParseError {
                message: format!("Failed to parse response: {e}"),
            })
        } else {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            Err(OpenAiError::from_status_and_body(status, &error_body))
        }
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }
}
