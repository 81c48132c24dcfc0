//! Text embeddings for transcript chunks and queries.
//!
//! Providers return raw vectors; [`EmbeddingService`] wraps whichever one is
//! configured and never fails. Callers read [`EmbeddingStatus`] to tell a real
//! vector from the zero sentinel.

pub mod local;
pub mod openai;
pub mod service;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::openai::OpenAiError;

pub use local::LocalHashEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;
pub use service::{EmbeddingBackend, EmbeddingService};

/// Dimension of every vector stored in the index (text-embedding-ada-002)
pub const EMBEDDING_DIM: usize = 1536;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding provider error: {0}")]
    Provider(#[from] OpenAiError),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Cannot embed empty text")]
    EmptyInput,
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EmbeddingStatus {
    /// A real vector from the provider
    Computed,
    /// No provider configured; the vector is the zero sentinel
    Unconfigured,
    /// The provider failed; the vector is the zero sentinel
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub vector: Vec<f32>,
    pub status: EmbeddingStatus,
}

impl Embedding {
    pub fn computed(vector: Vec<f32>) -> Self {
        Self {
            vector,
            status: EmbeddingStatus::Computed,
        }
    }

    pub fn sentinel(dimension: usize, status: EmbeddingStatus) -> Self {
        Self {
            vector: vec![0.0; dimension],
            status,
        }
    }

    pub fn is_computed(&self) -> bool {
        self.status == EmbeddingStatus::Computed
    }
}
