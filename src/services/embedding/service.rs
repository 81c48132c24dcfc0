use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{Config, EmbeddingProviderKind};
use crate::services::openai::OpenAiClient;

use super::{
    Embedding, EmbeddingError, EmbeddingProvider, EmbeddingStatus, LocalHashEmbeddingProvider,
    OpenAiEmbeddingProvider, EMBEDDING_DIM,
};

/// Embedding strategy, chosen once when the assistant is built
#[derive(Clone)]
pub enum EmbeddingBackend {
    Provider(Arc<dyn EmbeddingProvider>),
    Unconfigured,
}

impl EmbeddingBackend {
    /// `openai_client` is the shared OpenAI handle, present when a key is set.
    pub fn from_config(config: &Config, openai_client: Option<&OpenAiClient>) -> Self {
        match config.embedding.provider {
            EmbeddingProviderKind::Local => EmbeddingBackend::Provider(Arc::new(
                LocalHashEmbeddingProvider::new(EMBEDDING_DIM),
            )),
            EmbeddingProviderKind::OpenAi => match openai_client {
                Some(client) => EmbeddingBackend::Provider(Arc::new(
                    OpenAiEmbeddingProvider::new(client.clone()),
                )),
                None => {
                    warn!("OPENAI_API_KEY not set; embeddings will be zero vectors");
                    EmbeddingBackend::Unconfigured
                }
            },
        }
    }

    pub fn describe(&self) -> String {
        match self {
            EmbeddingBackend::Provider(provider) => {
                format!("{} ({})", provider.provider_name(), provider.model_name())
            }
            EmbeddingBackend::Unconfigured => "unconfigured".to_string(),
        }
    }
}

/// Fail-soft wrapper around the configured provider.
///
/// Every call returns a vector of exactly `dimension` floats. One attempt per
/// call; failures are logged and reported through the status.
#[derive(Clone)]
pub struct EmbeddingService {
    backend: EmbeddingBackend,
    dimension: usize,
}

impl EmbeddingService {
    pub fn new(backend: EmbeddingBackend) -> Self {
        Self::with_dimension(backend, EMBEDDING_DIM)
    }

    pub fn with_dimension(backend: EmbeddingBackend, dimension: usize) -> Self {
        Self { backend, dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn backend(&self) -> &EmbeddingBackend {
        &self.backend
    }

    pub async fn embed(&self, text: &str) -> Embedding {
        let provider = match &self.backend {
            EmbeddingBackend::Provider(provider) => provider,
            EmbeddingBackend::Unconfigured => {
                debug!("Embedding skipped: no provider configured");
                return Embedding::sentinel(self.dimension, EmbeddingStatus::Unconfigured);
            }
        };

        let result = provider.embed(text).await.and_then(|vector| {
            if vector.len() == self.dimension {
                Ok(vector)
            } else {
                Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                })
            }
        });

        match result {
            Ok(vector) => Embedding::computed(vector),
            Err(e) => {
                warn!(
                    provider = provider.provider_name(),
                    error = %e,
                    "Embedding failed; using zero vector"
                );
                Embedding::sentinel(self.dimension, EmbeddingStatus::Failed)
            }
        }
    }
}
