use serde::{Deserialize, Serialize};

/// Where the context of a retrieval came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContextSource {
    /// Live index query
    Index,
    /// Illustrative strings from a degraded index
    Placeholder,
    /// No usable query embedding, or the index failed
    Unavailable,
}

impl std::fmt::Display for ContextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextSource::Index => write!(f, "index"),
            ContextSource::Placeholder => write!(f, "placeholder"),
            ContextSource::Unavailable => write!(f, "unavailable"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalMatch {
    pub text: String,
    pub score: f32,
}

/// Context for one query, ordered by descending score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalResult {
    pub matches: Vec<RetrievalMatch>,
    pub source: ContextSource,
}

impl RetrievalResult {
    pub fn new(matches: Vec<RetrievalMatch>, source: ContextSource) -> Self {
        Self { matches, source }
    }

    pub fn unavailable() -> Self {
        Self::new(Vec::new(), ContextSource::Unavailable)
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn texts(&self) -> Vec<String> {
        self.matches.iter().map(|m| m.text.clone()).collect()
    }
}
