pub mod client;
pub mod errors;
pub mod models;

pub use client::{GoogleAiClient, GoogleAiConfig};
pub use errors::GoogleAiError;
pub use models::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
