//! Semantic index backends.
//!
//! Every query carries a [`MetadataFilter`], and a filter cannot be built
//! without a session id.

pub mod degraded;
pub mod errors;
pub mod memory;
pub mod pinecone;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::{Config, IndexBackendKind};
use crate::models::{record_id_in_session, session_id_prefix, RecordMetadata, SemanticRecord};
use crate::services::embedding::EMBEDDING_DIM;

pub use degraded::{DegradedIndex, PLACEHOLDER_CONTEXTS};
pub use errors::IndexError;
pub use memory::InMemoryIndex;
pub use pinecone::{PineconeConfig, PineconeIndex};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IndexMode {
    Live,
    /// No index configured; writes are dropped and queries return placeholders
    Degraded,
}

impl std::fmt::Display for IndexMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexMode::Live => write!(f, "live"),
            IndexMode::Degraded => write!(f, "degraded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexMatch {
    pub record_id: String,
    pub score: f32,
    pub metadata: RecordMetadata,
}

/// Equality filter on the session a record belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFilter {
    session_id: String,
}

impl MetadataFilter {
    pub fn session(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Pinecone metadata filter expression
    pub fn to_json(&self) -> Value {
        json!({ "session_id": { "$eq": self.session_id } })
    }

    /// Record id prefix shared by every record of the session
    pub fn id_prefix(&self) -> String {
        session_id_prefix(&self.session_id)
    }

    /// Whether a listed record id belongs to this session
    pub fn owns_record_id(&self, record_id: &str) -> bool {
        record_id_in_session(record_id, &self.session_id)
    }

    pub fn matches(&self, metadata: &RecordMetadata) -> bool {
        metadata.session_id == self.session_id
    }
}

#[async_trait]
pub trait SemanticIndex: Send + Sync {
    fn mode(&self) -> IndexMode;

    fn backend_name(&self) -> &'static str;

    /// Insert or overwrite the record with the same id
    async fn upsert(&self, record: SemanticRecord) -> Result<(), IndexError>;

    /// Up to `top_k` matches passing `filter`, best first
    async fn query(
        &self,
        vector: &[f32],
        filter: &MetadataFilter,
        top_k: usize,
    ) -> Result<Vec<IndexMatch>, IndexError>;

    /// Returns how many ids were submitted for deletion
    async fn delete_by_ids(&self, ids: &[String]) -> Result<usize, IndexError>;

    async fn list_ids(&self, filter: &MetadataFilter) -> Result<Vec<String>, IndexError>;
}

/// Build the configured index. Missing credentials select the degraded index.
pub fn build_index(config: &Config) -> Result<Arc<dyn SemanticIndex>, IndexError> {
    match config.index.backend {
        IndexBackendKind::Pinecone => match config.api.pinecone_api_key.clone().filter(|key| !key.is_empty()) {
            Some(api_key) => {
                let pinecone_config = PineconeConfig::new(api_key, config.index.name.clone())
                    .with_serverless(config.index.cloud.clone(), config.index.region.clone())
                    .with_timeout(std::time::Duration::from_secs(config.generation.timeout_secs));
                Ok(Arc::new(PineconeIndex::new(pinecone_config)?))
            }
            None => Ok(Arc::new(DegradedIndex::new("PINECONE_API_KEY not set"))),
        },
        IndexBackendKind::Memory => Ok(Arc::new(InMemoryIndex::new(EMBEDDING_DIM))),
        IndexBackendKind::Disabled => Ok(Arc::new(DegradedIndex::new("index disabled in config"))),
    }
}
