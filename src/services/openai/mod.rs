pub mod client;
pub mod errors;
pub mod models;

pub use client::{OpenAiClient, OpenAiConfig};
pub use errors::OpenAiError;
pub use models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, EmbeddingRequest, EmbeddingResponse};
