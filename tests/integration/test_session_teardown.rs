use panda::models::TranscriptChunk;
use panda::services::embedding::LocalHashEmbeddingProvider;
use panda::services::vector_index::{MetadataFilter, SemanticIndex};
use panda::services::{
    EmbeddingBackend, EmbeddingService, GenerationBackend, InMemoryIndex, RetrievalService,
    SessionAssistant, EMBEDDING_DIM,
};
use std::sync::Arc;

fn assistant(index: Arc<InMemoryIndex>) -> SessionAssistant {
    SessionAssistant::new(
        EmbeddingBackend::Provider(Arc::new(LocalHashEmbeddingProvider::new(EMBEDDING_DIM))),
        index,
        GenerationBackend::Placeholder,
    )
    .with_retrieval(5, 0.0)
}

async fn ingest_lines(assistant: &SessionAssistant, session_id: &str, lines: &[&str]) {
    for (i, line) in lines.iter().enumerate() {
        let chunk = TranscriptChunk::new(session_id, "p1", *line).with_id(format!("c{i}"));
        assert!(assistant.ingest_chunk(session_id, &chunk).await.is_indexed());
    }
}

#[tokio::test]
async fn test_forget_removes_only_that_session() {
    let index = Arc::new(InMemoryIndex::new(EMBEDDING_DIM));
    let assistant = assistant(index.clone());

    ingest_lines(&assistant, "s1", &["gradient descent", "learning rate", "loss curves"]).await;
    ingest_lines(&assistant, "s2", &["gradient descent", "momentum"]).await;

    let report = assistant.delete_session_data("s1").await;
    assert_eq!(report.requested, 3);
    assert_eq!(report.deleted, 3);

    let remaining = index.list_ids(&MetadataFilter::session("s2")).await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(index
        .list_ids(&MetadataFilter::session("s1"))
        .await
        .unwrap()
        .is_empty());

    let retrieval = RetrievalService::new(
        EmbeddingService::new(EmbeddingBackend::Provider(Arc::new(
            LocalHashEmbeddingProvider::new(EMBEDDING_DIM),
        ))),
        index.clone(),
    )
    .with_score_threshold(0.0);
    assert!(retrieval
        .retrieve_texts("s1", "gradient descent", 5)
        .await
        .is_empty());
    assert_eq!(
        retrieval.retrieve_texts("s2", "gradient descent", 1).await,
        vec!["gradient descent".to_string()]
    );
}

#[tokio::test]
async fn test_forget_is_idempotent() {
    let index = Arc::new(InMemoryIndex::new(EMBEDDING_DIM));
    let assistant = assistant(index.clone());

    ingest_lines(&assistant, "s1", &["one line"]).await;
    assert_eq!(assistant.delete_session_data("s1").await.deleted, 1);

    let second = assistant.delete_session_data("s1").await;
    assert_eq!(second.requested, 0);
    assert_eq!(second.deleted, 0);
}

#[tokio::test]
async fn test_prefix_sibling_session_survives() {
    let index = Arc::new(InMemoryIndex::new(EMBEDDING_DIM));
    let assistant = assistant(index.clone());

    ingest_lines(&assistant, "s1", &["alpha"]).await;
    ingest_lines(&assistant, "s1_extra", &["beta"]).await;

    assistant.delete_session_data("s1").await;

    let survivors = index
        .list_ids(&MetadataFilter::session("s1_extra"))
        .await
        .unwrap();
    assert_eq!(survivors, vec!["s1%5Fextra_c0".to_string()]);
}

#[tokio::test]
async fn test_underscored_ids_stay_distinct_across_sessions() {
    let index = Arc::new(InMemoryIndex::new(EMBEDDING_DIM));
    let assistant = assistant(index.clone());

    let first = TranscriptChunk::new("a_b", "p1", "first session").with_id("c");
    let second = TranscriptChunk::new("a", "p1", "second session").with_id("b_c");
    assert!(assistant.ingest_chunk("a_b", &first).await.is_indexed());
    assert!(assistant.ingest_chunk("a", &second).await.is_indexed());

    assert_eq!(index.len().await, 2);
    assert_eq!(
        index.list_ids(&MetadataFilter::session("a_b")).await.unwrap().len(),
        1
    );

    assert_eq!(assistant.delete_session_data("a").await.deleted, 1);
    assert_eq!(
        index.list_ids(&MetadataFilter::session("a_b")).await.unwrap().len(),
        1
    );
}
