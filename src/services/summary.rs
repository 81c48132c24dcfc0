use tracing::warn;

use crate::services::llm::{GenerateRequest, GenerationBackend};

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert at summarizing educational content.";
pub const SUMMARY_MAX_TOKENS: u32 = 300;
pub const SUMMARY_TEMPERATURE: f32 = 0.5;

pub const PLACEHOLDER_SUMMARY: &str =
    "This is a mock summary of the session transcript for development purposes.";
pub const FALLBACK_SUMMARY: &str = "Unable to generate summary at this time.";
pub const EMPTY_SUMMARY: &str = "No summary available.";

pub fn build_summary_prompt(transcript: &str) -> String {
    format!(
        r#"Please provide a concise summary of the following session transcript, highlighting the key points and main topics discussed.

Transcript:
{transcript}

Summary should be 2-3 paragraphs maximum."#
    )
}

#[derive(Clone, Debug)]
pub struct Summarizer {
    backend: GenerationBackend,
}

impl Summarizer {
    pub fn new(backend: GenerationBackend) -> Self {
        Self { backend }
    }

    pub async fn summarize_transcript(&self, transcript: &str) -> String {
        let client = match &self.backend {
            GenerationBackend::Provider(client) => client,
            GenerationBackend::Placeholder => return PLACEHOLDER_SUMMARY.to_string(),
        };

        let request = GenerateRequest::new(build_summary_prompt(transcript))
            .with_system_prompt(SUMMARY_SYSTEM_PROMPT.to_string())
            .with_max_tokens(SUMMARY_MAX_TOKENS)
            .with_temperature(SUMMARY_TEMPERATURE);

        match client.generate(request).await {
            Ok(response) if !response.text.trim().is_empty() => response.text.trim().to_string(),
            Ok(_) => EMPTY_SUMMARY.to_string(),
            Err(e) => {
                warn!(
                    provider = client.provider_name(),
                    kind = e.kind(),
                    error = %e,
                    "Summary generation failed"
                );
                FALLBACK_SUMMARY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm::mock::MockLlm;
    use crate::services::llm::{GenerateResponse, LlmError};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_placeholder() {
        let summary = Summarizer::new(GenerationBackend::Placeholder)
            .summarize_transcript("text")
            .await;
        assert_eq!(summary, PLACEHOLDER_SUMMARY);
    }

    #[tokio::test]
    async fn test_generated_uses_summary_parameters() {
        let mut mock = MockLlm::new();
        mock.expect_generate()
            .withf(|r| {
                r.temperature == Some(SUMMARY_TEMPERATURE)
                    && r.max_tokens == Some(SUMMARY_MAX_TOKENS)
                    && r.prompt.contains("2-3 paragraphs")
            })
            .times(1)
            .returning(|_| Ok(GenerateResponse::new("A short summary.\n")));

        let summary = Summarizer::new(GenerationBackend::Provider(Arc::new(mock)))
            .summarize_transcript("text")
            .await;
        assert_eq!(summary, "A short summary.");
    }

    #[tokio::test]
    async fn test_error_and_blank() {
        let mut failing = MockLlm::new();
        failing
            .expect_generate()
            .times(1)
            .returning(|_| Err(LlmError::ServerError { message: "500".to_string() }));
        failing.expect_provider_name().return_const("mock");
        let summary = Summarizer::new(GenerationBackend::Provider(Arc::new(failing)))
            .summarize_transcript("text")
            .await;
        assert_eq!(summary, FALLBACK_SUMMARY);

        let mut blank = MockLlm::new();
        blank
            .expect_generate()
            .times(1)
            .returning(|_| Ok(GenerateResponse::new("")));
        let summary = Summarizer::new(GenerationBackend::Provider(Arc::new(blank)))
            .summarize_transcript("text")
            .await;
        assert_eq!(summary, EMPTY_SUMMARY);
    }
}
