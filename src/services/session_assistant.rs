use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::Config;
use crate::logging::log_performance;
use crate::models::{AnswerOrigin, ExtractedTask, QueryOutcome, TaskExtraction, TranscriptChunk};
use crate::services::answer::AnswerGenerator;
use crate::services::embedding::{EmbeddingBackend, EmbeddingService};
use crate::services::ingestion::{DeletionReport, IngestReport, IngestionService};
use crate::services::llm::{GenerationBackend, LlmError};
use crate::services::openai::{OpenAiClient, OpenAiConfig};
use crate::services::retrieval::{RetrievalService, DEFAULT_TOP_K};
use crate::services::summary::Summarizer;
use crate::services::tasks::TaskExtractor;
use crate::services::vector_index::{build_index, IndexMode, SemanticIndex};
use crate::PandaError;

/// Which strategy each layer resolved to
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssistantStatus {
    pub embedding: String,
    pub index_backend: String,
    pub index_mode: IndexMode,
    pub generation: String,
}

/// Public surface of the assistant core.
///
/// Every strategy is fixed at construction. None of the operations fail:
/// provider and index errors degrade into placeholder or fallback output.
#[derive(Clone)]
pub struct SessionAssistant {
    ingestion: IngestionService,
    retrieval: RetrievalService,
    answers: AnswerGenerator,
    tasks: TaskExtractor,
    summarizer: Summarizer,
    index: Arc<dyn SemanticIndex>,
    embedding_backend: EmbeddingBackend,
    generation_backend: GenerationBackend,
    top_k: usize,
}

impl SessionAssistant {
    pub fn new(
        embedding_backend: EmbeddingBackend,
        index: Arc<dyn SemanticIndex>,
        generation_backend: GenerationBackend,
    ) -> Self {
        let embeddings = EmbeddingService::new(embedding_backend.clone());
        Self {
            ingestion: IngestionService::new(embeddings.clone(), index.clone()),
            retrieval: RetrievalService::new(embeddings, index.clone()),
            answers: AnswerGenerator::new(generation_backend.clone()),
            tasks: TaskExtractor::new(generation_backend.clone()),
            summarizer: Summarizer::new(generation_backend.clone()),
            index,
            embedding_backend,
            generation_backend,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Resolve every strategy from configuration.
    ///
    /// Missing keys select degraded strategies. Only a malformed configuration
    /// (for example an unbuildable HTTP client) is an error.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let openai_client = match OpenAiConfig::from_app_config(config) {
            Some(openai_config) => Some(
                OpenAiClient::new(openai_config)
                    .map_err(|e| PandaError::provider("openai".to_string(), e.to_string()))?,
            ),
            None => None,
        };

        let embedding_backend = EmbeddingBackend::from_config(config, openai_client.as_ref());
        let index = build_index(config)
            .map_err(|e| PandaError::provider("index".to_string(), e.to_string()))?;
        let generation_backend = GenerationBackend::select(config, openai_client.as_ref());

        let assistant = Self::new(embedding_backend, index, generation_backend)
            .with_retrieval(config.retrieval.top_k, config.retrieval.score_threshold);

        let status = assistant.status();
        info!(
            embedding = %status.embedding,
            index = %status.index_backend,
            index_mode = %status.index_mode,
            generation = %status.generation,
            "Session assistant ready"
        );
        Ok(assistant)
    }

    pub fn with_retrieval(mut self, top_k: usize, score_threshold: f32) -> Self {
        self.top_k = top_k;
        self.retrieval = self.retrieval.with_score_threshold(score_threshold);
        self
    }

    pub fn status(&self) -> AssistantStatus {
        AssistantStatus {
            embedding: self.embedding_backend.describe(),
            index_backend: self.index.backend_name().to_string(),
            index_mode: self.index.mode(),
            generation: self.generation_backend.describe(),
        }
    }

    /// Send one minimal request to the generation provider, if any
    pub async fn check_generation(&self) -> Option<Result<(), LlmError>> {
        self.generation_backend.health_check().await
    }

    /// Store one transcript chunk for later retrieval
    #[instrument(skip(self, chunk), fields(chunk_id = %chunk.id))]
    pub async fn ingest_chunk(&self, session_id: &str, chunk: &TranscriptChunk) -> IngestReport {
        self.ingestion.ingest_chunk(session_id, chunk).await
    }

    /// Answer a question grounded in the session's transcript
    pub async fn answer_query(&self, session_id: &str, question: &str) -> String {
        self.answer_query_detailed(session_id, question)
            .await
            .answer
            .answer_text
    }

    #[instrument(skip(self, question))]
    pub async fn answer_query_detailed(&self, session_id: &str, question: &str) -> QueryOutcome {
        let start = Instant::now();

        let retrieved = self.retrieval.retrieve(session_id, question, self.top_k).await;
        let context = retrieved.texts();
        let answer = self.answers.generate_answer(question, &context).await;

        log_performance(
            "answer_query",
            start.elapsed().as_millis() as u64,
            answer.origin == AnswerOrigin::Generated,
        );

        QueryOutcome {
            answer,
            context,
            context_source: retrieved.source,
        }
    }

    pub async fn extract_tasks(&self, transcript: &str) -> Vec<ExtractedTask> {
        self.extract_tasks_detailed(transcript).await.tasks
    }

    pub async fn extract_tasks_detailed(&self, transcript: &str) -> TaskExtraction {
        self.tasks.extract_tasks(transcript).await
    }

    pub async fn summarize_transcript(&self, transcript: &str) -> String {
        self.summarizer.summarize_transcript(transcript).await
    }

    /// Remove everything stored for the session
    pub async fn delete_session_data(&self, session_id: &str) -> DeletionReport {
        self.ingestion.delete_session(session_id).await
    }
}
