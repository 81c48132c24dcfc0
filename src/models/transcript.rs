use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One piece of live transcript text, as produced by the speaker's client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptChunk {
    pub id: String,
    pub session_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub speaker_id: String,
}

impl TranscriptChunk {
    pub fn new(session_id: impl Into<String>, speaker_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            text: text.into(),
            timestamp: Utc::now(),
            speaker_id: speaker_id.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whitespace-only chunks carry nothing worth indexing
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
