//! Action items from a session transcript.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{ExtractedTask, TaskExtraction, TaskOrigin, TaskPriority};
use crate::services::llm::{GenerateRequest, GenerationBackend};
use crate::utils::json_payload_candidates;

pub const TASK_SYSTEM_PROMPT: &str =
    "You are an expert at creating educational tasks and action items. Always respond with valid JSON.";
pub const TASK_MAX_TOKENS: u32 = 500;
pub const TASK_TEMPERATURE: f32 = 0.7;
pub const MAX_TASKS: usize = 5;

#[derive(Debug, Error)]
pub enum TaskParseError {
    #[error("No JSON payload found in model output")]
    NoPayload,

    #[error("Invalid task JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("No usable tasks in model output")]
    Empty,
}

/// Development list returned when no provider is configured
pub fn placeholder_tasks() -> Vec<ExtractedTask> {
    vec![
        ExtractedTask::new(
            "Review AI fundamentals",
            "Study the basic concepts of artificial intelligence covered in today's session",
            TaskPriority::Medium,
        ),
        ExtractedTask::new(
            "Practice neural network exercises",
            "Complete the recommended exercises on neural network implementation",
            TaskPriority::High,
        ),
        ExtractedTask::new(
            "Research machine learning applications",
            "Find real-world examples of machine learning applications in your field of interest",
            TaskPriority::Low,
        ),
    ]
}

/// Generic list returned when the provider fails or its output can't be parsed
pub fn fallback_tasks() -> Vec<ExtractedTask> {
    vec![
        ExtractedTask::new(
            "Review session notes",
            "Go through the key points discussed in this session",
            TaskPriority::Medium,
        ),
        ExtractedTask::new(
            "Complete follow-up reading",
            "Read additional materials related to today's topics",
            TaskPriority::Low,
        ),
    ]
}

pub fn build_task_prompt(transcript: &str) -> String {
    format!(
        r#"Based on the following session transcript, generate a list of actionable tasks and checklist items for participants.

Transcript:
{transcript}

Please create 3-5 specific, actionable tasks that participants should complete based on the session content.
For each task, provide:
- title: A clear, concise title
- description: A detailed description of what needs to be done
- priority: low, medium, or high

Return the response as a JSON array of objects with these fields."#
    )
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TaskPayload {
    List(Vec<RawTask>),
    Wrapped { tasks: Vec<RawTask> },
}

#[derive(Debug, Deserialize)]
struct RawTask {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<Value>,
}

/// Parse model output into at most [`MAX_TASKS`] tasks.
///
/// Accepts a bare array or `{"tasks": [...]}`, optionally wrapped in prose or
/// a code fence. Each JSON candidate in the output is tried in order and the
/// first one holding usable tasks wins. Items without a title are dropped.
pub fn parse_tasks(output: &str) -> Result<Vec<ExtractedTask>, TaskParseError> {
    let mut saw_empty = false;
    let mut shape_error = None;

    for payload in json_payload_candidates(output) {
        let raw_tasks = match serde_json::from_str::<TaskPayload>(payload) {
            Ok(TaskPayload::List(tasks) | TaskPayload::Wrapped { tasks }) => tasks,
            Err(e) => {
                shape_error.get_or_insert(e);
                continue;
            }
        };

        let tasks = usable_tasks(raw_tasks);
        if !tasks.is_empty() {
            return Ok(tasks);
        }
        saw_empty = true;
    }

    match shape_error {
        _ if saw_empty => Err(TaskParseError::Empty),
        Some(e) => Err(TaskParseError::InvalidJson(e)),
        None => Err(TaskParseError::NoPayload),
    }
}

fn usable_tasks(raw_tasks: Vec<RawTask>) -> Vec<ExtractedTask> {
    raw_tasks
        .into_iter()
        .filter_map(|raw| {
            let title = raw.title.map(|t| t.trim().to_string()).unwrap_or_default();
            if title.is_empty() {
                debug!("Dropping task without a title");
                return None;
            }
            let priority = TaskPriority::parse_lenient(raw.priority.as_ref().and_then(Value::as_str));
            Some(ExtractedTask::new(
                title,
                raw.description.map(|d| d.trim().to_string()).unwrap_or_default(),
                priority,
            ))
        })
        .take(MAX_TASKS)
        .collect()
}

#[derive(Clone, Debug)]
pub struct TaskExtractor {
    backend: GenerationBackend,
}

impl TaskExtractor {
    pub fn new(backend: GenerationBackend) -> Self {
        Self { backend }
    }

    pub async fn extract_tasks(&self, transcript: &str) -> TaskExtraction {
        let client = match &self.backend {
            GenerationBackend::Provider(client) => client,
            GenerationBackend::Placeholder => {
                return TaskExtraction {
                    tasks: placeholder_tasks(),
                    origin: TaskOrigin::Placeholder,
                };
            }
        };

        let request = GenerateRequest::new(build_task_prompt(transcript))
            .with_system_prompt(TASK_SYSTEM_PROMPT.to_string())
            .with_max_tokens(TASK_MAX_TOKENS)
            .with_temperature(TASK_TEMPERATURE);

        let output = match client.generate(request).await {
            Ok(response) => response.text,
            Err(e) => {
                warn!(
                    provider = client.provider_name(),
                    kind = e.kind(),
                    error = %e,
                    "Task generation failed"
                );
                return fallback();
            }
        };

        match parse_tasks(&output) {
            Ok(tasks) => TaskExtraction {
                tasks,
                origin: TaskOrigin::Generated,
            },
            Err(e) => {
                warn!(provider = client.provider_name(), error = %e, "Could not parse generated tasks");
                fallback()
            }
        }
    }
}

fn fallback() -> TaskExtraction {
    TaskExtraction {
        tasks: fallback_tasks(),
        origin: TaskOrigin::Fallback,
    }
}
