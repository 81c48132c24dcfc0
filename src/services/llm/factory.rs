//! LLM client factory and generation strategy selection

use std::sync::Arc;

use crate::config::Config;
use crate::services::openai::OpenAiClient;

use super::adapters::{GoogleAiAdapter, OpenAiAdapter};
use super::errors::LlmError;
use super::traits::LlmClient;
use super::types::{LlmConfig, LlmProvider};

/// Factory for creating LLM clients based on provider configuration
pub struct LlmClientFactory;

impl LlmClientFactory {
    pub fn create(config: LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
        match config.provider {
            LlmProvider::OpenAi => Ok(Arc::new(OpenAiAdapter::new(config)?)),
            LlmProvider::GoogleAi => Ok(Arc::new(GoogleAiAdapter::new(config)?)),
        }
    }

    /// Build the `LlmConfig` for `provider` from application config, if its
    /// API key is present.
    pub fn config_for(provider: LlmProvider, config: &Config) -> Option<LlmConfig> {
        let generation = &config.generation;
        let llm_config = match provider {
            LlmProvider::OpenAi => LlmConfig::openai(config.api.openai_api_key.clone()?)
                .with_model(generation.openai_model.clone()),
            LlmProvider::GoogleAi => LlmConfig::google_ai(config.api.gemini_api_key.clone()?)
                .with_model(generation.gemini_model.clone()),
        };
        Some(llm_config.with_timeout(generation.timeout_secs))
    }
}

/// Text generation strategy, chosen once when the assistant is built
#[derive(Clone)]
pub enum GenerationBackend {
    Provider(Arc<dyn LlmClient>),
    /// No provider configured; callers return labeled placeholder text
    Placeholder,
}

impl GenerationBackend {
    /// Pick the backend, reusing `openai_client` when OpenAI is chosen.
    ///
    /// An explicit provider wins when its key is present. Otherwise OpenAI is
    /// preferred over Google AI, and with neither key the placeholder backend
    /// is used.
    pub fn select(config: &Config, openai_client: Option<&OpenAiClient>) -> Self {
        let mut candidates = Vec::with_capacity(3);

        if let Some(name) = config.generation.provider.as_deref() {
            match name.parse::<LlmProvider>() {
                Ok(provider) => candidates.push(provider),
                Err(e) => tracing::warn!(error = %e, "Ignoring unknown generation provider"),
            }
        }
        candidates.extend([LlmProvider::OpenAi, LlmProvider::GoogleAi]);

        for provider in candidates {
            let client: Arc<dyn LlmClient> = match provider {
                LlmProvider::OpenAi => match openai_client {
                    Some(client) => Arc::new(OpenAiAdapter::from_client(client.clone())),
                    None => continue,
                },
                LlmProvider::GoogleAi => {
                    let Some(llm_config) = LlmClientFactory::config_for(provider, config) else {
                        continue;
                    };
                    match LlmClientFactory::create(llm_config) {
                        Ok(client) => client,
                        Err(e) => {
                            tracing::warn!(provider = %provider, error = %e, "Failed to create generation client");
                            continue;
                        }
                    }
                }
            };

            tracing::info!(
                provider = client.provider_name(),
                model = client.model_name(),
                "Generation provider selected"
            );
            return GenerationBackend::Provider(client);
        }

        tracing::warn!("No generative provider configured; answers will be placeholders");
        GenerationBackend::Placeholder
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, GenerationBackend::Provider(_))
    }

    /// Probe the selected provider with one minimal request.
    ///
    /// Returns `None` for the placeholder backend, which has nothing to check.
    pub async fn health_check(&self) -> Option<Result<(), LlmError>> {
        match self {
            GenerationBackend::Provider(client) => Some(client.health_check().await),
            GenerationBackend::Placeholder => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            GenerationBackend::Provider(client) => {
                format!("{} ({})", client.provider_name(), client.model_name())
            }
            GenerationBackend::Placeholder => "placeholder".to_string(),
        }
    }
}

impl std::fmt::Debug for GenerationBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GenerationBackend({})", self.describe())
    }
}
