use panda::config::{Config, IndexBackendKind};
use panda::models::{AnswerOrigin, ContextSource, TranscriptChunk};
use panda::services::answer::{AnswerGenerator, PLACEHOLDER_MARKER};
use panda::services::summary::PLACEHOLDER_SUMMARY;
use panda::services::vector_index::PLACEHOLDER_CONTEXTS;
use panda::services::{
    EmbeddingBackend, EmbeddingService, EmbeddingStatus, GenerationBackend, IndexMode,
    IngestOutcome, InMemoryIndex, SessionAssistant, EMBEDDING_DIM,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn keyless_config(backend: &str) -> Config {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        format!("[index]\nbackend = \"{backend}\"\n\n[retrieval]\ntop_k = 3\n"),
    )
    .unwrap();

    Config::load_from(&path).unwrap()
}

#[tokio::test]
async fn test_no_credentials_builds_degraded_assistant() {
    let config = keyless_config("pinecone");
    assert_eq!(config.index.backend, IndexBackendKind::Pinecone);
    assert_eq!(config.retrieval.top_k, 3);

    let assistant = SessionAssistant::from_config(&config).unwrap();
    let status = assistant.status();

    assert_eq!(status.embedding, "unconfigured");
    assert_eq!(status.index_backend, "degraded");
    assert_eq!(status.index_mode, IndexMode::Degraded);
    assert_eq!(status.generation, "placeholder");
}

#[tokio::test]
async fn test_answer_is_marked_placeholder() {
    let assistant = SessionAssistant::from_config(&keyless_config("disabled")).unwrap();

    let answer = assistant.answer_query("s1", "What did we cover?").await;
    assert!(!answer.is_empty());
    assert!(answer.contains(PLACEHOLDER_MARKER));
    assert!(answer.contains("What did we cover?"));

    let outcome = assistant.answer_query_detailed("s1", "What did we cover?").await;
    assert_eq!(outcome.context_source, ContextSource::Placeholder);
    assert_eq!(outcome.context, PLACEHOLDER_CONTEXTS.map(String::from).to_vec());
    assert_eq!(outcome.answer.origin, AnswerOrigin::Placeholder);
}

#[tokio::test]
async fn test_degraded_index_drops_writes() {
    let assistant = SessionAssistant::from_config(&keyless_config("disabled")).unwrap();
    let chunk = TranscriptChunk::new("s1", "p1", "Neural networks process information in layers.");

    let report = assistant.ingest_chunk("s1", &chunk).await;
    assert_eq!(report.outcome, IngestOutcome::SkippedDegraded);

    let report = assistant.delete_session_data("s1").await;
    assert_eq!(report.requested, 0);
}

#[tokio::test]
async fn test_unconfigured_embedding_returns_sentinel() {
    let service = EmbeddingService::new(EmbeddingBackend::Unconfigured);
    let embedding = service.embed("anything").await;

    assert_eq!(embedding.status, EmbeddingStatus::Unconfigured);
    assert_eq!(embedding.vector.len(), EMBEDDING_DIM);
    assert!(embedding.vector.iter().all(|x| *x == 0.0));
}

#[tokio::test]
async fn test_live_index_without_embeddings_stays_empty() {
    let index = Arc::new(InMemoryIndex::new(EMBEDDING_DIM));
    let assistant = SessionAssistant::new(
        EmbeddingBackend::Unconfigured,
        index.clone(),
        GenerationBackend::Placeholder,
    );

    let chunk = TranscriptChunk::new("s1", "p1", "text").with_id("c1");
    let report = assistant.ingest_chunk("s1", &chunk).await;
    assert_eq!(
        report.outcome,
        IngestOutcome::SkippedNoEmbedding(EmbeddingStatus::Unconfigured)
    );
    assert!(index.is_empty().await);

    let outcome = assistant.answer_query_detailed("s1", "text?").await;
    assert_eq!(outcome.context_source, ContextSource::Unavailable);
    assert!(outcome.context.is_empty());
    assert!(outcome.answer.answer_text.contains(PLACEHOLDER_MARKER));
}

#[tokio::test]
async fn test_empty_context_takes_placeholder_path() {
    let generator = AnswerGenerator::new(GenerationBackend::Placeholder);
    let answer = generator.generate_answer("Why?", &[]).await;

    assert_eq!(answer.origin, AnswerOrigin::Placeholder);
    assert!(answer.answer_text.contains(PLACEHOLDER_MARKER));
}

#[tokio::test]
async fn test_summary_placeholder() {
    let assistant = SessionAssistant::from_config(&keyless_config("disabled")).unwrap();
    assert_eq!(
        assistant.summarize_transcript("Some transcript").await,
        PLACEHOLDER_SUMMARY
    );
}
