use anyhow::Result;

use crate::cli::load_assistant;
use crate::config::Config;

pub async fn handle_status_command(check: bool) -> Result<()> {
    let (config, assistant) = load_assistant()?;
    let status = assistant.status();

    println!("Panda status:");
    println!("  Config:     {}", Config::get_config_path()?.display());
    println!("  Embedding:  {}", status.embedding);
    println!("  Index:      {} ({})", status.index_backend, status.index_mode);
    println!("  Generation: {}", status.generation);
    println!(
        "  Retrieval:  top_k={} threshold>{}",
        config.retrieval.top_k, config.retrieval.score_threshold
    );

    if check {
        match assistant.check_generation().await {
            Some(Ok(())) => println!("  Check:      generation provider reachable"),
            Some(Err(e)) => println!("  Check:      generation provider failed: {e}"),
            None => println!("  Check:      skipped, no generation provider"),
        }
    }
    Ok(())
}
