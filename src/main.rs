use clap::Parser;
use panda::cli::Cli;
use panda::logging::LoggingConfig;

fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (ignore errors if missing)
    dotenvy::dotenv().ok();

    let logging = LoggingConfig::from_env().with_level(
        std::env::var(panda::env::logging::LOG_LEVEL)
            .ok()
            .and_then(|level| level.parse().ok())
            .unwrap_or(tracing::Level::WARN),
    );
    let _guard = panda::init_logging(logging)?;

    let cli = Cli::parse();
    cli.run()
}
