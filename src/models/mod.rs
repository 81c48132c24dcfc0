pub mod answer;
pub mod record;
pub mod retrieval;
pub mod task;
pub mod transcript;

pub use answer::{AnswerOrigin, GroundedAnswer, QueryOutcome};
pub use record::{
    record_id_for, record_id_in_session, session_id_prefix, RecordMetadata, SemanticRecord,
};
pub use retrieval::{ContextSource, RetrievalMatch, RetrievalResult};
pub use task::{ExtractedTask, TaskExtraction, TaskOrigin, TaskPriority};
pub use transcript::TranscriptChunk;
