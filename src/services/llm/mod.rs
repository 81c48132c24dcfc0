//! Generative provider abstraction
//!
//! - OpenAI chat completions (remote, requires API key)
//! - Google AI API (remote, requires API key)

pub mod adapters;
pub mod errors;
pub mod factory;
pub mod traits;
pub mod types;

pub use adapters::{GoogleAiAdapter, OpenAiAdapter};
pub use errors::LlmError;
pub use factory::{GenerationBackend, LlmClientFactory};
pub use traits::LlmClient;
pub use types::{GenerateRequest, GenerateResponse, LlmConfig, LlmProvider};
