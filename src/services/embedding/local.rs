//! Offline embeddings from hashed word counts.
//!
//! Good enough to exercise the pipeline without network access: texts that
//! share words land close together. Not a semantic model.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{EmbeddingError, EmbeddingProvider};

pub struct LocalHashEmbeddingProvider {
    dimension: usize,
}

impl LocalHashEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Deterministic, unit-length vector for `text`
    pub fn embed_sync(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0f32; self.dimension];
        let mut tokens = 0usize;

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let hash = hasher.finish();

            let index = (hash % self.dimension as u64) as usize;
            // High bit picks the sign so collisions partly cancel
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[index] += sign;
            tokens += 1;
        }

        if tokens == 0 {
            return Err(EmbeddingError::EmptyInput);
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        Ok(vector)
    }
}

#[async_trait]
impl EmbeddingProvider for LocalHashEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_sync(text)
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }

    fn model_name(&self) -> &str {
        "hashed-bag-of-words"
    }
}
