pub mod cli;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub mod env;
pub mod error;
pub mod logging;

pub use error::{PandaError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use services::SessionAssistant;
