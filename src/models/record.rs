use serde::{Deserialize, Serialize};

use super::transcript::TranscriptChunk;

/// Metadata stored alongside every vector. Field names are the ones the index
/// filters on, so `session_id` must stay stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordMetadata {
    pub session_id: String,
    pub chunk_id: String,
    pub text: String,
    pub timestamp: String,
    pub speaker_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemanticRecord {
    pub record_id: String,
    pub vector: Vec<f32>,
    pub metadata: RecordMetadata,
}

/// Record ids are `{session}_{chunk}` with `%` and `_` percent-escaped in
/// both parts. The only raw `_` is the separator, so ids are unique per
/// (session, chunk) pair and a session's records share an exact prefix.
pub fn record_id_for(session_id: &str, chunk_id: &str) -> String {
    format!("{}_{}", escape_id_part(session_id), escape_id_part(chunk_id))
}

pub fn session_id_prefix(session_id: &str) -> String {
    format!("{}_", escape_id_part(session_id))
}

/// True when `record_id` was built by [`record_id_for`] for `session_id`
pub fn record_id_in_session(record_id: &str, session_id: &str) -> bool {
    record_id
        .strip_prefix(&session_id_prefix(session_id))
        .map_or(false, |chunk_part| !chunk_part.contains('_'))
}

fn escape_id_part(part: &str) -> String {
    part.replace('%', "%25").replace('_', "%5F")
}

impl SemanticRecord {
    /// Build the record for `chunk` under `session_id`. The explicit session id
    /// wins over whatever the chunk carries.
    pub fn from_chunk(session_id: &str, chunk: &TranscriptChunk, vector: Vec<f32>) -> Self {
        Self {
            record_id: record_id_for(session_id, &chunk.id),
            vector,
            metadata: RecordMetadata {
                session_id: session_id.to_string(),
                chunk_id: chunk.id.clone(),
                text: chunk.text.clone(),
                timestamp: chunk.timestamp.to_rfc3339(),
                speaker_id: chunk.speaker_id.clone(),
            },
        }
    }
}
