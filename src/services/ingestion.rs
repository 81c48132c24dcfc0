use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{SemanticRecord, TranscriptChunk};
use crate::services::embedding::{EmbeddingService, EmbeddingStatus};
use crate::services::vector_index::{IndexMode, MetadataFilter, SemanticIndex};

/// Upper bound on ids per delete request
pub const DELETE_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum IngestOutcome {
    /// Upsert finished; the chunk is queryable
    Indexed,
    /// The index is degraded and drops writes
    SkippedDegraded,
    /// No real embedding was available
    SkippedNoEmbedding(EmbeddingStatus),
    /// The index rejected the upsert
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestReport {
    pub record_id: String,
    pub outcome: IngestOutcome,
}

impl IngestReport {
    pub fn is_indexed(&self) -> bool {
        self.outcome == IngestOutcome::Indexed
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DeletionReport {
    pub requested: usize,
    pub deleted: usize,
}

/// Writes transcript chunks into the index and removes them again
#[derive(Clone)]
pub struct IngestionService {
    embeddings: EmbeddingService,
    index: Arc<dyn SemanticIndex>,
}

impl IngestionService {
    pub fn new(embeddings: EmbeddingService, index: Arc<dyn SemanticIndex>) -> Self {
        Self { embeddings, index }
    }

    /// Embed and upsert one chunk. Returns once the upsert has completed.
    pub async fn ingest_chunk(&self, session_id: &str, chunk: &TranscriptChunk) -> IngestReport {
        if chunk.session_id != session_id {
            warn!(
                session_id,
                chunk_session_id = %chunk.session_id,
                chunk_id = %chunk.id,
                "Chunk carries a different session id; using the explicit one"
            );
        }

        let record_id = crate::models::record_id_for(session_id, &chunk.id);

        if self.index.mode() == IndexMode::Degraded {
            debug!(record_id = %record_id, "Index degraded; chunk not stored");
            return IngestReport {
                record_id,
                outcome: IngestOutcome::SkippedDegraded,
            };
        }

        let embedding = self.embeddings.embed(&chunk.text).await;
        if !embedding.is_computed() {
            warn!(
                record_id = %record_id,
                status = ?embedding.status,
                "Chunk not indexed: no embedding"
            );
            return IngestReport {
                record_id,
                outcome: IngestOutcome::SkippedNoEmbedding(embedding.status),
            };
        }

        let record = SemanticRecord::from_chunk(session_id, chunk, embedding.vector);
        match self.index.upsert(record).await {
            Ok(()) => {
                debug!(record_id = %record_id, "Chunk indexed");
                IngestReport {
                    record_id,
                    outcome: IngestOutcome::Indexed,
                }
            }
            Err(e) => {
                warn!(
                    record_id = %record_id,
                    backend = self.index.backend_name(),
                    error = %e,
                    "Upsert failed"
                );
                IngestReport {
                    record_id,
                    outcome: IngestOutcome::Failed(e.to_string()),
                }
            }
        }
    }

    /// Remove every record of the session. Failed batches are logged and skipped.
    pub async fn delete_session(&self, session_id: &str) -> DeletionReport {
        if self.index.mode() == IndexMode::Degraded {
            return DeletionReport::default();
        }

        let ids = match self.index.list_ids(&MetadataFilter::session(session_id)).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(session_id, error = %e, "Could not list session records");
                return DeletionReport::default();
            }
        };

        let mut report = DeletionReport {
            requested: ids.len(),
            deleted: 0,
        };

        for batch in ids.chunks(DELETE_BATCH_SIZE) {
            match self.index.delete_by_ids(batch).await {
                Ok(count) => report.deleted += count,
                Err(e) => warn!(
                    session_id,
                    batch_size = batch.len(),
                    error = %e,
                    "Delete batch failed"
                ),
            }
        }

        info!(
            session_id,
            requested = report.requested,
            deleted = report.deleted,
            "Session data deleted"
        );
        report
    }
}
