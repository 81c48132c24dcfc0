pub mod config;
pub mod session;
pub mod status;
pub mod transcript;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::services::SessionAssistant;

#[derive(Parser)]
#[command(name = "panda")]
#[command(about = "Live-session assistant: transcript retrieval, answers and task extraction")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest one transcript chunk into a session
    Ingest {
        /// Session the chunk belongs to
        #[arg(short, long)]
        session: String,
        /// Transcript text
        #[arg(short, long)]
        text: String,
        /// Speaker id (default: "speaker")
        #[arg(long)]
        speaker: Option<String>,
        /// Chunk id (random when omitted)
        #[arg(long)]
        chunk_id: Option<String>,
    },
    /// Answer a question from the session's transcript
    Ask {
        #[arg(short, long)]
        session: String,
        /// The question to answer
        question: String,
        /// Number of chunks to retrieve (default: from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Print the retrieved context as well
        #[arg(long)]
        show_context: bool,
    },
    /// Extract action items from a transcript
    Tasks {
        #[command(flatten)]
        input: TranscriptInput,
        /// Print the tasks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize a transcript
    Summarize {
        #[command(flatten)]
        input: TranscriptInput,
    },
    /// Ingest a transcript file line by line, then answer a question
    Replay {
        #[arg(short, long)]
        session: String,
        /// Transcript file, one chunk per line
        #[arg(short, long)]
        file: String,
        /// The question to answer after ingestion
        #[arg(short, long)]
        question: String,
    },
    /// Delete everything stored for a session
    Forget {
        #[arg(short, long)]
        session: String,
    },
    /// Show which providers and index are active
    Status {
        /// Also send one request to the generation provider
        #[arg(long)]
        check: bool,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Args)]
pub struct TranscriptInput {
    /// Transcript text
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    pub text: Option<String>,
    /// Read the transcript from a file
    #[arg(short, long)]
    pub file: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Key such as openai-api-key or top-k
        key: String,
    },
    /// Set a configuration value
    Set { key: String, value: String },
    /// Remove a configuration value
    Unset { key: String },
    /// List all configuration values
    List,
    /// Print the configuration file path
    Path,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let rt = Runtime::new()?;

        rt.block_on(async {
            match self.command {
                Commands::Ingest {
                    session,
                    text,
                    speaker,
                    chunk_id,
                } => session::handle_ingest_command(session, text, speaker, chunk_id).await,
                Commands::Ask {
                    session,
                    question,
                    top_k,
                    show_context,
                } => session::handle_ask_command(session, question, top_k, show_context).await,
                Commands::Tasks { input, json } => {
                    transcript::handle_tasks_command(input, json).await
                }
                Commands::Summarize { input } => transcript::handle_summarize_command(input).await,
                Commands::Replay {
                    session,
                    file,
                    question,
                } => session::handle_replay_command(session, file, question).await,
                Commands::Forget { session } => session::handle_forget_command(session).await,
                Commands::Status { check } => status::handle_status_command(check).await,
                Commands::Config { command } => match command {
                    ConfigCommands::Get { key } => config::handle_get_command(key),
                    ConfigCommands::Set { key, value } => config::handle_set_command(key, value),
                    ConfigCommands::Unset { key } => config::handle_unset_command(key),
                    ConfigCommands::List => config::handle_list_command(),
                    ConfigCommands::Path => config::handle_path_command(),
                },
            }
        })
    }
}

/// Load config (file plus environment) and build the assistant from it
pub(crate) fn load_assistant() -> anyhow::Result<(Config, SessionAssistant)> {
    let config = Config::load_with_env()?;
    let assistant = SessionAssistant::from_config(&config)?;
    Ok((config, assistant))
}
