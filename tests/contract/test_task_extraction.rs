use async_trait::async_trait;
use mockall::mock;
use panda::models::{TaskOrigin, TaskPriority};
use panda::services::llm::{
    GenerateRequest, GenerateResponse, GenerationBackend, LlmClient, LlmError,
};
use panda::services::tasks::{fallback_tasks, placeholder_tasks, TaskExtractor, TASK_SYSTEM_PROMPT};
use panda::services::SessionAssistant;
use panda::services::{DegradedIndex, EmbeddingBackend};
use std::sync::Arc;

mock! {
    pub Llm {}

    #[async_trait]
    impl LlmClient for Llm {
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;
        fn provider_name(&self) -> &'static str;
        fn model_name(&self) -> &str;
        async fn health_check(&self) -> Result<(), LlmError>;
    }
}

const TRANSCRIPT: &str = "Today we covered gradient descent. Please read chapter 4 before Friday.";

fn extractor_replying(reply: Result<&'static str, LlmError>) -> TaskExtractor {
    let mut mock = MockLlm::new();
    mock.expect_provider_name().return_const("mock");

    let mut reply = Some(reply);
    mock.expect_generate()
        .times(1)
        .withf(|request| {
            request.prompt.contains(TRANSCRIPT)
                && request.system_prompt.as_deref() == Some(TASK_SYSTEM_PROMPT)
        })
        .returning(move |_| match reply.take() {
            Some(Ok(text)) => Ok(GenerateResponse::new(text)),
            Some(Err(e)) => Err(e),
            None => Err(LlmError::InvalidResponse {
                message: "called twice".to_string(),
            }),
        });

    TaskExtractor::new(GenerationBackend::Provider(Arc::new(mock)))
}

#[tokio::test]
async fn test_fenced_json_is_parsed() {
    let reply = "Here are the tasks:\n```json\n[\n  {\"title\": \"Read chapter 4\", \"description\": \"Before Friday\", \"priority\": \"high\"},\n  {\"title\": \"Try gradient descent\", \"description\": \"On a toy dataset\", \"priority\": \"LOW\"}\n]\n```";
    let extraction = extractor_replying(Ok(reply)).extract_tasks(TRANSCRIPT).await;

    assert_eq!(extraction.origin, TaskOrigin::Generated);
    assert_eq!(extraction.tasks.len(), 2);
    assert_eq!(extraction.tasks[0].title, "Read chapter 4");
    assert_eq!(extraction.tasks[0].priority, TaskPriority::High);
    assert_eq!(extraction.tasks[1].priority, TaskPriority::Low);
}

#[tokio::test]
async fn test_wrapped_object_is_parsed() {
    let reply = r#"{"tasks": [{"title": "Review notes", "priority": "medium"}]}"#;
    let extraction = extractor_replying(Ok(reply)).extract_tasks(TRANSCRIPT).await;

    assert_eq!(extraction.origin, TaskOrigin::Generated);
    assert_eq!(extraction.tasks[0].title, "Review notes");
    assert_eq!(extraction.tasks[0].description, "");
}

#[tokio::test]
async fn test_prose_reply_yields_fallback() {
    let extraction = extractor_replying(Ok("Sure! Just review your notes."))
        .extract_tasks(TRANSCRIPT)
        .await;

    assert_eq!(extraction.origin, TaskOrigin::Fallback);
    assert_eq!(extraction.tasks, fallback_tasks());
}

#[tokio::test]
async fn test_provider_error_yields_fallback_after_one_attempt() {
    let extraction = extractor_replying(Err(LlmError::RateLimitExceeded {
        message: "slow down".to_string(),
    }))
    .extract_tasks(TRANSCRIPT)
    .await;

    assert_eq!(extraction.origin, TaskOrigin::Fallback);
    assert_eq!(extraction.tasks.len(), 2);
}

#[tokio::test]
async fn test_task_list_is_capped() {
    let items: Vec<String> = (1..=8)
        .map(|i| format!(r#"{{"title": "Task {i}", "description": "d", "priority": "low"}}"#))
        .collect();
    let reply: &'static str = Box::leak(format!("[{}]", items.join(",")).into_boxed_str());

    let extraction = extractor_replying(Ok(reply)).extract_tasks(TRANSCRIPT).await;
    assert_eq!(extraction.tasks.len(), 5);
    assert_eq!(extraction.tasks[4].title, "Task 5");
}

#[tokio::test]
async fn test_unconfigured_assistant_returns_placeholder_tasks() {
    let assistant = SessionAssistant::new(
        EmbeddingBackend::Unconfigured,
        Arc::new(DegradedIndex::new("test")),
        GenerationBackend::Placeholder,
    );

    let tasks = assistant.extract_tasks(TRANSCRIPT).await;
    assert_eq!(tasks, placeholder_tasks());
    assert_eq!(tasks.len(), 3);
}
