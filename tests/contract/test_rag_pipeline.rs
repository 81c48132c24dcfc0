use async_trait::async_trait;
use panda::models::{ContextSource, RecordMetadata, SemanticRecord, TranscriptChunk};
use panda::services::embedding::{
    EmbeddingBackend, EmbeddingError, EmbeddingProvider, EmbeddingService, EMBEDDING_DIM,
};
use panda::services::vector_index::{
    IndexError, IndexMatch, IndexMode, InMemoryIndex, MetadataFilter, SemanticIndex,
};
use panda::services::{GenerationBackend, RetrievalService, SessionAssistant};
use std::sync::Arc;

/// Projects text onto two topic axes plus a small constant component
struct KeywordEmbedder;

const NEURAL_WORDS: [&str; 5] = ["neural", "network", "networks", "layer", "layers"];
const WEATHER_WORDS: [&str; 4] = ["rain", "weather", "sunny", "tomorrow"];

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0f32; EMBEDDING_DIM];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
        {
            if NEURAL_WORDS.contains(&word.as_str()) {
                vector[0] += 1.0;
            } else if WEATHER_WORDS.contains(&word.as_str()) {
                vector[1] += 1.0;
            }
        }
        vector[2] = 0.1;

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        Ok(vector.into_iter().map(|x| x / norm).collect())
    }

    fn provider_name(&self) -> &'static str {
        "keyword"
    }

    fn model_name(&self) -> &str {
        "keyword-v1"
    }
}

fn embeddings() -> EmbeddingService {
    EmbeddingService::new(EmbeddingBackend::Provider(Arc::new(KeywordEmbedder)))
}

fn assistant_with(index: Arc<InMemoryIndex>) -> SessionAssistant {
    SessionAssistant::new(
        EmbeddingBackend::Provider(Arc::new(KeywordEmbedder)),
        index,
        GenerationBackend::Placeholder,
    )
}

#[tokio::test]
async fn test_neural_networks_scenario() {
    let index = Arc::new(InMemoryIndex::new(EMBEDDING_DIM));
    let assistant = assistant_with(index.clone());
    let retrieval = RetrievalService::new(embeddings(), index.clone());

    let chunk = TranscriptChunk::new("s1", "lecturer", "Neural networks process information in layers.")
        .with_id("c1");
    assert!(assistant.ingest_chunk("s1", &chunk).await.is_indexed());

    let hits = retrieval
        .retrieve_texts("s1", "how do neural networks work?", 5)
        .await;
    assert_eq!(
        hits,
        vec!["Neural networks process information in layers.".to_string()]
    );

    let other = retrieval
        .retrieve("s2", "how do neural networks work?", 5)
        .await;
    assert!(other.is_empty());
    assert_eq!(other.source, ContextSource::Index);
}

#[tokio::test]
async fn test_sessions_never_leak() {
    let index = Arc::new(InMemoryIndex::new(EMBEDDING_DIM));
    let assistant = assistant_with(index.clone());
    let retrieval = RetrievalService::new(embeddings(), index.clone());

    for session in ["alpha", "beta"] {
        let chunk = TranscriptChunk::new(session, "p1", format!("{session} neural networks layers"))
            .with_id("c1");
        assert!(assistant.ingest_chunk(session, &chunk).await.is_indexed());
    }

    for (session, other) in [("alpha", "beta"), ("beta", "alpha")] {
        for question in ["neural networks", "layers", "alpha", "beta", "rain"] {
            let texts = retrieval.retrieve_texts(session, question, 10).await;
            assert!(
                texts.iter().all(|t| !t.starts_with(other)),
                "{session} saw {other}'s chunk for '{question}'"
            );
        }
    }
}

#[tokio::test]
async fn test_reingesting_a_chunk_overwrites_it() {
    let index = Arc::new(InMemoryIndex::new(EMBEDDING_DIM));
    let assistant = assistant_with(index.clone());
    let retrieval = RetrievalService::new(embeddings(), index.clone());

    let first = TranscriptChunk::new("s1", "p1", "Neural networks have layers.").with_id("c1");
    let second =
        TranscriptChunk::new("s1", "p2", "Neural networks have many layers.").with_id("c1");
    assistant.ingest_chunk("s1", &first).await;
    assistant.ingest_chunk("s1", &second).await;

    assert_eq!(index.len().await, 1);
    let texts = retrieval.retrieve_texts("s1", "neural networks", 5).await;
    assert_eq!(texts, vec!["Neural networks have many layers.".to_string()]);
}

#[tokio::test]
async fn test_unrelated_chunks_fall_below_threshold() {
    let index = Arc::new(InMemoryIndex::new(EMBEDDING_DIM));
    let assistant = assistant_with(index.clone());
    let retrieval = RetrievalService::new(embeddings(), index.clone());

    let chunk = TranscriptChunk::new("s1", "p1", "It will rain tomorrow.").with_id("c1");
    assistant.ingest_chunk("s1", &chunk).await;

    assert!(retrieval
        .retrieve_texts("s1", "how do neural networks work?", 5)
        .await
        .is_empty());
}

/// Returns the same scored matches for any query
struct FixedScoreIndex {
    scores: Vec<f32>,
}

#[async_trait]
impl SemanticIndex for FixedScoreIndex {
    fn mode(&self) -> IndexMode {
        IndexMode::Live
    }

    fn backend_name(&self) -> &'static str {
        "fixed"
    }

    async fn upsert(&self, _record: SemanticRecord) -> Result<(), IndexError> {
        Ok(())
    }

    async fn query(
        &self,
        _vector: &[f32],
        filter: &MetadataFilter,
        _top_k: usize,
    ) -> Result<Vec<IndexMatch>, IndexError> {
        Ok(self
            .scores
            .iter()
            .enumerate()
            .map(|(i, score)| IndexMatch {
                record_id: format!("{}_c{i}", filter.session_id()),
                score: *score,
                metadata: RecordMetadata {
                    session_id: filter.session_id().to_string(),
                    chunk_id: format!("c{i}"),
                    text: format!("score {score}"),
                    timestamp: "2024-01-01T00:00:00+00:00".to_string(),
                    speaker_id: "p1".to_string(),
                },
            })
            .collect())
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<usize, IndexError> {
        Ok(ids.len())
    }

    async fn list_ids(&self, _filter: &MetadataFilter) -> Result<Vec<String>, IndexError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_threshold_is_exclusive() {
    let index = Arc::new(FixedScoreIndex {
        scores: vec![0.7, 0.7000001, 0.95, 0.2],
    });
    let retrieval = RetrievalService::new(embeddings(), index);

    let result = retrieval.retrieve("s1", "neural", 5).await;
    let scores: Vec<f32> = result.matches.iter().map(|m| m.score).collect();

    assert_eq!(scores, vec![0.95, 0.7000001]);
}
