use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::{RecordMetadata, SemanticRecord};

use super::{IndexError, IndexMatch, IndexMode, MetadataFilter, SemanticIndex};

/// Illustrative context returned when no index is configured
pub const PLACEHOLDER_CONTEXTS: [&str; 3] = [
    "Welcome everyone to today's session. Today we'll be covering the fundamentals of artificial intelligence and machine learning.",
    "Let's start with the basics of neural networks and how they process information.",
    "Machine learning models require careful validation and testing to ensure accuracy.",
];

/// Stand-in index used without credentials. Writes are dropped.
pub struct DegradedIndex {
    reason: String,
}

impl DegradedIndex {
    pub fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(reason = %reason, "Semantic index unavailable; running in degraded mode");
        Self { reason }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl SemanticIndex for DegradedIndex {
    fn mode(&self) -> IndexMode {
        IndexMode::Degraded
    }

    fn backend_name(&self) -> &'static str {
        "degraded"
    }

    async fn upsert(&self, record: SemanticRecord) -> Result<(), IndexError> {
        debug!(record_id = %record.record_id, "Degraded index dropped upsert");
        Ok(())
    }

    async fn query(
        &self,
        _vector: &[f32],
        filter: &MetadataFilter,
        top_k: usize,
    ) -> Result<Vec<IndexMatch>, IndexError> {
        Ok(PLACEHOLDER_CONTEXTS
            .iter()
            .take(top_k)
            .enumerate()
            .map(|(i, text)| IndexMatch {
                record_id: format!("placeholder-{i}"),
                score: 1.0,
                metadata: RecordMetadata {
                    session_id: filter.session_id().to_string(),
                    chunk_id: format!("placeholder-{i}"),
                    text: text.to_string(),
                    timestamp: String::new(),
                    speaker_id: String::new(),
                },
            })
            .collect())
    }

    async fn delete_by_ids(&self, _ids: &[String]) -> Result<usize, IndexError> {
        Ok(0)
    }

    async fn list_ids(&self, _filter: &MetadataFilter) -> Result<Vec<String>, IndexError> {
        Ok(Vec::new())
    }
}
