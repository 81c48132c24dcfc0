//! Provider-agnostic types for LLM interactions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LlmProvider {
    /// OpenAI chat completions
    OpenAi,
    /// Google AI API (Gemini models via REST API)
    GoogleAi,
}

impl std::str::FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "openai" | "open-ai" | "gpt" => Ok(LlmProvider::OpenAi),
            "google" | "google-ai" | "googleai" | "gemini" | "gemini-api" => {
                Ok(LlmProvider::GoogleAi)
            }
            _ => Err(format!(
                "Unknown LLM provider: {s}. Valid options: openai, google-ai"
            )),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::OpenAi => write!(f, "openai"),
            LlmProvider::GoogleAi => write!(f, "google-ai"),
        }
    }
}

/// Request for text generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    /// The prompt text to send to the LLM
    pub prompt: String,

    /// Maximum tokens to generate (optional, provider defaults apply)
    pub max_tokens: Option<u32>,

    /// Temperature for sampling (0.0 - 1.0, optional)
    pub temperature: Option<f32>,

    /// System role framing
    pub system_prompt: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: String) -> Self {
        Self {
            prompt,
            max_tokens: None,
            temperature: None,
            system_prompt: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: String) -> Self {
        self.system_prompt = Some(system_prompt);
        self
    }
}

/// Response from text generation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerateResponse {
    /// The generated text content
    pub text: String,

    /// Total tokens, when the provider reports them
    pub total_tokens: Option<u32>,

    /// Model used for generation
    pub model_used: Option<String>,

    /// Reason for stopping generation
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Configuration for LLM client creation
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: String,
    pub model: Option<String>,
    pub timeout_secs: u64,
    /// Override of the provider's API base URL
    pub base_url: Option<String>,
}

impl LlmConfig {
    pub fn openai(api_key: String) -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            api_key,
            model: None,
            timeout_secs: 60,
            base_url: None,
        }
    }

    pub fn google_ai(api_key: String) -> Self {
        Self {
            provider: LlmProvider::GoogleAi,
            ..Self::openai(api_key)
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }
}
