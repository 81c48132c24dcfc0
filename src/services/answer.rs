//! Grounded answer generation.
//!
//! One provider attempt per question. Provider problems never reach the
//! caller: they turn into fixed, user-facing fallback text.

use tracing::{info, warn};

use crate::models::{AnswerOrigin, GroundedAnswer};
use crate::services::llm::{GenerateRequest, GenerationBackend};

pub const ANSWER_SYSTEM_PROMPT: &str = "You are a helpful AI assistant for educational sessions.";
pub const ANSWER_MAX_TOKENS: u32 = 300;
pub const ANSWER_TEMPERATURE: f32 = 0.7;

/// Rendered in place of context when retrieval found nothing
pub const NO_CONTEXT_TEXT: &str = "No specific context available.";
/// Present in every answer produced without a provider
pub const PLACEHOLDER_MARKER: &str = "This is a mock response for development purposes.";
pub const FALLBACK_ANSWER: &str = "I apologize, but I'm having trouble processing your question right now. Please try asking the speaker directly.";
pub const DECLINE_ANSWER: &str = "I don't have enough information to answer that question. Please ask the speaker for clarification.";

pub fn build_grounding_prompt(question: &str, context: &[String]) -> String {
    let context_text = if context.is_empty() {
        NO_CONTEXT_TEXT.to_string()
    } else {
        context.join("\n\n")
    };

    format!(
        r#"You are an AI assistant helping students and participants understand session content.
Based on the following context from the live session, please answer the user's question accurately and helpfully.
Use only the context below. Do not rely on outside knowledge.

Context from session:
{context_text}

Question: {question}

Please provide a clear, concise answer based on the session content. If the question cannot be answered from the provided context, politely indicate that and suggest asking the speaker directly."#
    )
}

pub fn placeholder_answer(question: &str) -> String {
    format!(
        "Based on the session content, here's what I understand about your question: '{question}'. {PLACEHOLDER_MARKER}"
    )
}

#[derive(Clone, Debug)]
pub struct AnswerGenerator {
    backend: GenerationBackend,
}

impl AnswerGenerator {
    pub fn new(backend: GenerationBackend) -> Self {
        Self { backend }
    }

    pub async fn generate_answer(&self, question: &str, context: &[String]) -> GroundedAnswer {
        let client = match &self.backend {
            GenerationBackend::Provider(client) => client,
            GenerationBackend::Placeholder => {
                return GroundedAnswer::new(placeholder_answer(question), AnswerOrigin::Placeholder);
            }
        };

        let request = GenerateRequest::new(build_grounding_prompt(question, context))
            .with_system_prompt(ANSWER_SYSTEM_PROMPT.to_string())
            .with_max_tokens(ANSWER_MAX_TOKENS)
            .with_temperature(ANSWER_TEMPERATURE);

        match client.generate(request).await {
            Ok(response) => {
                let text = response.text.trim();
                if text.is_empty() {
                    info!(provider = client.provider_name(), "Provider returned an empty answer");
                    GroundedAnswer::new(DECLINE_ANSWER, AnswerOrigin::Declined)
                } else {
                    GroundedAnswer::new(text, AnswerOrigin::Generated)
                }
            }
            Err(e) => {
                warn!(
                    provider = client.provider_name(),
                    kind = e.kind(),
                    error = %e,
                    "Answer generation failed"
                );
                GroundedAnswer::new(FALLBACK_ANSWER, AnswerOrigin::Fallback)
            }
        }
    }
}
