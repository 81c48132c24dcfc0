use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(format!("Unknown task priority: {s}")),
        }
    }
}

impl TaskPriority {
    /// Lenient parse used for model output; anything unrecognized is medium.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
}

impl ExtractedTask {
    pub fn new(title: impl Into<String>, description: impl Into<String>, priority: TaskPriority) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskOrigin {
    Generated,
    Placeholder,
    Fallback,
}

/// The task list plus how it was obtained
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskExtraction {
    pub tasks: Vec<ExtractedTask>,
    pub origin: TaskOrigin,
}
