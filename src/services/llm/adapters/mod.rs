pub mod google_ai;
pub mod openai;

pub use google_ai::GoogleAiAdapter;
pub use openai::OpenAiAdapter;
