use anyhow::{Context, Result};

use crate::cli::{load_assistant, TranscriptInput};

async fn read_transcript(input: TranscriptInput) -> Result<String> {
    match (input.text, input.file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read transcript file: {path}")),
        (None, None) => anyhow::bail!("Provide --text or --file"),
    }
}

pub async fn handle_tasks_command(input: TranscriptInput, json: bool) -> Result<()> {
    let transcript = read_transcript(input).await?;
    let (_, assistant) = load_assistant()?;

    let extraction = assistant.extract_tasks_detailed(&transcript).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&extraction.tasks)?);
        return Ok(());
    }

    println!("Tasks ({:?}):", extraction.origin);
    for (i, task) in extraction.tasks.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, task.priority, task.title);
        if !task.description.is_empty() {
            println!("     {}", task.description);
        }
    }
    Ok(())
}

pub async fn handle_summarize_command(input: TranscriptInput) -> Result<()> {
    let transcript = read_transcript(input).await?;
    let (_, assistant) = load_assistant()?;

    println!("{}", assistant.summarize_transcript(&transcript).await);
    Ok(())
}
