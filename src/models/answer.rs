use serde::{Deserialize, Serialize};

use super::retrieval::ContextSource;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnswerOrigin {
    /// Text produced by a generative provider
    Generated,
    /// No provider configured
    Placeholder,
    /// The provider call failed
    Fallback,
    /// The provider answered with nothing usable
    Declined,
}

impl std::fmt::Display for AnswerOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerOrigin::Generated => write!(f, "generated"),
            AnswerOrigin::Placeholder => write!(f, "placeholder"),
            AnswerOrigin::Fallback => write!(f, "fallback"),
            AnswerOrigin::Declined => write!(f, "declined"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroundedAnswer {
    pub answer_text: String,
    pub origin: AnswerOrigin,
}

impl GroundedAnswer {
    pub fn new(answer_text: impl Into<String>, origin: AnswerOrigin) -> Self {
        Self {
            answer_text: answer_text.into(),
            origin,
        }
    }
}

/// An answer together with the context it was grounded in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryOutcome {
    pub answer: GroundedAnswer,
    pub context: Vec<String>,
    pub context_source: ContextSource,
}
