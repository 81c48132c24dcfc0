use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

impl GenerateContentRequest {
    pub fn new(text: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::Text { text }],
                role: Some("user".to_string()),
            }],
            system_instruction: None,
            generation_config: None,
        }
    }

    pub fn with_system_instruction(mut self, text: String) -> Self {
        self.system_instruction = Some(Content {
            parts: vec![Part::Text { text }],
            role: None,
        });
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    pub fn extract_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .map(|part| match part {
                Part::Text { text } => text.as_str(),
            })
            .collect();
        Some(text)
    }

    pub fn get_token_usage(&self) -> Option<u32> {
        self.usage_metadata
            .as_ref()
            .and_then(|meta| meta.total_token_count)
    }

    pub fn get_finish_reason(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.clone())
    }

    pub fn validate(&self) -> Result<(), String> {
        let candidate = self
            .candidates
            .first()
            .ok_or_else(|| "No candidates in response".to_string())?;

        match candidate.finish_reason.as_deref() {
            None | Some("STOP") | Some("MAX_TOKENS") => {}
            Some("SAFETY") => return Err("Response blocked by safety filters".to_string()),
            Some("RECITATION") => return Err("Response blocked due to recitation".to_string()),
            Some(reason) => return Err(format!("Unexpected finish reason: {reason}")),
        }

        if candidate.content.as_ref().map_or(true, |c| c.parts.is_empty()) {
            return Err("No content parts in response".to_string());
        }

        Ok(())
    }
}
