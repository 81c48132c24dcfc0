pub mod answer;
pub mod embedding;
pub mod google_ai;
pub mod ingestion;
pub mod llm;
pub mod openai;
pub mod retrieval;
pub mod session_assistant;
pub mod summary;
pub mod tasks;
pub mod vector_index;

pub use answer::AnswerGenerator;
pub use embedding::{Embedding, EmbeddingBackend, EmbeddingService, EmbeddingStatus, EMBEDDING_DIM};
pub use ingestion::{DeletionReport, IngestOutcome, IngestReport, IngestionService};
pub use llm::{GenerationBackend, LlmClient};
pub use retrieval::RetrievalService;
pub use session_assistant::{AssistantStatus, SessionAssistant};
pub use summary::Summarizer;
pub use tasks::TaskExtractor;
pub use vector_index::{DegradedIndex, InMemoryIndex, IndexMode, PineconeIndex, SemanticIndex};
