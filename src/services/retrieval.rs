use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{ContextSource, RetrievalMatch, RetrievalResult};
use crate::services::embedding::EmbeddingService;
use crate::services::vector_index::{IndexMode, MetadataFilter, SemanticIndex};

pub const DEFAULT_TOP_K: usize = 5;
/// Matches must score strictly above this
pub const SCORE_THRESHOLD: f32 = 0.7;

/// Turns a question into the session's most relevant transcript text
#[derive(Clone)]
pub struct RetrievalService {
    embeddings: EmbeddingService,
    index: Arc<dyn SemanticIndex>,
    score_threshold: f32,
}

impl RetrievalService {
    pub fn new(embeddings: EmbeddingService, index: Arc<dyn SemanticIndex>) -> Self {
        Self {
            embeddings,
            index,
            score_threshold: SCORE_THRESHOLD,
        }
    }

    pub fn with_score_threshold(mut self, score_threshold: f32) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    pub fn score_threshold(&self) -> f32 {
        self.score_threshold
    }

    /// Context strings for `query_text`, best first
    pub async fn retrieve_texts(&self, session_id: &str, query_text: &str, top_k: usize) -> Vec<String> {
        self.retrieve(session_id, query_text, top_k).await.texts()
    }

    pub async fn retrieve(&self, session_id: &str, query_text: &str, top_k: usize) -> RetrievalResult {
        let filter = MetadataFilter::session(session_id);

        if self.index.mode() == IndexMode::Degraded {
            return match self.index.query(&[], &filter, top_k).await {
                Ok(matches) => RetrievalResult::new(
                    matches
                        .into_iter()
                        .map(|m| RetrievalMatch {
                            text: m.metadata.text,
                            score: m.score,
                        })
                        .collect(),
                    ContextSource::Placeholder,
                ),
                Err(e) => {
                    warn!(session_id, error = %e, "Degraded index query failed");
                    RetrievalResult::unavailable()
                }
            };
        }

        if top_k == 0 {
            return RetrievalResult::new(Vec::new(), ContextSource::Index);
        }

        let embedding = self.embeddings.embed(query_text).await;
        if !embedding.is_computed() {
            debug!(session_id, status = ?embedding.status, "No query embedding; skipping index");
            return RetrievalResult::unavailable();
        }

        let matches = match self.index.query(&embedding.vector, &filter, top_k).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(
                    session_id,
                    backend = self.index.backend_name(),
                    error = %e,
                    "Index query failed"
                );
                return RetrievalResult::unavailable();
            }
        };

        let mut kept: Vec<RetrievalMatch> = matches
            .into_iter()
            .filter(|m| {
                let same_session = filter.matches(&m.metadata);
                if !same_session {
                    warn!(
                        session_id,
                        record_id = %m.record_id,
                        "Dropping match from another session"
                    );
                }
                same_session
            })
            .filter(|m| m.score > self.score_threshold)
            .map(|m| RetrievalMatch {
                text: m.metadata.text,
                score: m.score,
            })
            .collect();

        kept.sort_by(|a, b| b.score.total_cmp(&a.score));
        kept.truncate(top_k);

        debug!(session_id, matches = kept.len(), "Retrieved context");
        RetrievalResult::new(kept, ContextSource::Index)
    }
}
