use anyhow::{Context, Result};

use crate::cli::load_assistant;
use crate::models::TranscriptChunk;
use crate::services::IngestOutcome;

const DEFAULT_SPEAKER: &str = "speaker";

pub async fn handle_ingest_command(
    session: String,
    text: String,
    speaker: Option<String>,
    chunk_id: Option<String>,
) -> Result<()> {
    let (_, assistant) = load_assistant()?;

    let speaker = speaker.unwrap_or_else(|| DEFAULT_SPEAKER.to_string());
    let mut chunk = TranscriptChunk::new(&session, speaker, text);
    if let Some(id) = chunk_id {
        chunk = chunk.with_id(id);
    }

    let report = assistant.ingest_chunk(&session, &chunk).await;
    match &report.outcome {
        IngestOutcome::Indexed => println!("✓ Indexed {}", report.record_id),
        IngestOutcome::SkippedDegraded => {
            println!("Index not configured; {} was not stored", report.record_id)
        }
        IngestOutcome::SkippedNoEmbedding(status) => {
            println!("No embedding ({status:?}); {} was not stored", report.record_id)
        }
        IngestOutcome::Failed(message) => {
            println!("✗ Failed to index {}: {message}", report.record_id)
        }
    }

    Ok(())
}

pub async fn handle_ask_command(
    session: String,
    question: String,
    top_k: Option<usize>,
    show_context: bool,
) -> Result<()> {
    let (config, mut assistant) = load_assistant()?;
    if let Some(top_k) = top_k {
        assistant = assistant.with_retrieval(top_k, config.retrieval.score_threshold);
    }

    let outcome = assistant.answer_query_detailed(&session, &question).await;

    if show_context {
        println!("Context ({}):", outcome.context_source);
        if outcome.context.is_empty() {
            println!("  (none)");
        }
        for (i, text) in outcome.context.iter().enumerate() {
            println!("  {}. {}", i + 1, text);
        }
        println!();
    }

    println!("{}", outcome.answer.answer_text);
    Ok(())
}

pub async fn handle_replay_command(session: String, file: String, question: String) -> Result<()> {
    let (_, assistant) = load_assistant()?;

    let contents = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read transcript file: {file}"))?;

    let mut indexed = 0;
    let mut total = 0;
    for (line_no, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        total += 1;
        let chunk = TranscriptChunk::new(&session, "speaker", line.trim())
            .with_id(format!("line-{}", line_no + 1));
        if assistant.ingest_chunk(&session, &chunk).await.is_indexed() {
            indexed += 1;
        }
    }
    println!("Ingested {indexed}/{total} lines into session {session}");
    println!();

    let answer = assistant.answer_query(&session, &question).await;
    println!("{answer}");
    Ok(())
}

pub async fn handle_forget_command(session: String) -> Result<()> {
    let (_, assistant) = load_assistant()?;
    let report = assistant.delete_session_data(&session).await;
    println!(
        "Deleted {}/{} records for session {session}",
        report.deleted, report.requested
    );
    Ok(())
}
