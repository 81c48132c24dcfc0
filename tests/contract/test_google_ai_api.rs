use panda::services::answer::{AnswerGenerator, FALLBACK_ANSWER};
use panda::services::google_ai::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, GoogleAiClient,
    GoogleAiConfig, GoogleAiError,
};
use panda::services::llm::{
    GenerateRequest, GenerationBackend, GoogleAiAdapter, LlmClient, LlmConfig, LlmError,
};
use panda::models::AnswerOrigin;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve exactly one HTTP response and hand back the raw request text
async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&received);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if received.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&received).to_string()
    });

    (format!("http://{addr}/v1beta"), handle)
}

fn client_for(base_url: String) -> GoogleAiClient {
    let config = GoogleAiConfig::new("test_api_key".to_string())
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5));
    GoogleAiClient::new(config).unwrap()
}

const OK_BODY: &str = r#"{
    "candidates": [{
        "content": {"parts": [{"text": "Gradient descent "}, {"text": "minimizes loss."}], "role": "model"},
        "finishReason": "STOP"
    }],
    "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17}
}"#;

#[test]
fn test_config_requires_api_key() {
    let result = GoogleAiClient::new(GoogleAiConfig::new(String::new()));
    assert!(matches!(
        result,
        Err(GoogleAiError::ConfigurationError { .. })
    ));
}

#[test]
fn test_response_structure() {
    let response: GenerateContentResponse = serde_json::from_str(OK_BODY).unwrap();
    assert!(response.validate().is_ok());
    assert_eq!(
        response.extract_text().as_deref(),
        Some("Gradient descent minimizes loss.")
    );
    assert_eq!(response.get_token_usage(), Some(17));
    assert_eq!(response.get_finish_reason().as_deref(), Some("STOP"));
}

#[test]
fn test_safety_block_is_rejected() {
    let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
    let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
    let err = response.validate().unwrap_err();
    assert!(err.contains("blocked"));
}

#[tokio::test]
async fn test_generate_content_round_trip() {
    let (base_url, server) = serve_once("200 OK", OK_BODY.to_string()).await;
    let client = client_for(base_url);

    let request = GenerateContentRequest::new("Explain gradient descent".to_string())
        .with_system_instruction("Be brief".to_string())
        .with_generation_config(GenerationConfig {
            temperature: Some(0.7),
            max_output_tokens: Some(300),
            candidate_count: Some(1),
        });

    let response = client.generate_content(request).await.unwrap();
    assert_eq!(
        response.extract_text().as_deref(),
        Some("Gradient descent minimizes loss.")
    );

    let raw_request = server.await.unwrap();
    assert!(raw_request.starts_with("POST /v1beta/models/gemini-2.5-flash-lite:generateContent"));
    assert!(raw_request.to_lowercase().contains("x-goog-api-key: test_api_key"));
    assert!(raw_request.contains("\"systemInstruction\""));
    assert!(raw_request.contains("\"maxOutputTokens\":300"));
}

#[tokio::test]
async fn test_error_status_is_typed() {
    let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted"}}"#;
    let (base_url, server) = serve_once("429 Too Many Requests", body.to_string()).await;
    let client = client_for(base_url);

    let err = client
        .generate_content(GenerateContentRequest::new("hi".to_string()))
        .await
        .unwrap_err();
    assert!(err.is_rate_limit_error());
    assert!(err.to_string().contains("Resource has been exhausted"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_adapter_maps_response() {
    let (base_url, server) = serve_once("200 OK", OK_BODY.to_string()).await;
    let adapter = GoogleAiAdapter::new(
        LlmConfig::google_ai("test_api_key".to_string()).with_base_url(base_url),
    )
    .unwrap();

    assert_eq!(adapter.provider_name(), "google-ai");

    let response = adapter
        .generate(GenerateRequest::new("Explain gradient descent".to_string()).with_max_tokens(300))
        .await
        .unwrap();
    assert_eq!(response.text, "Gradient descent minimizes loss.");
    assert_eq!(response.total_tokens, Some(17));
    server.await.unwrap();
}

#[tokio::test]
async fn test_server_error_becomes_fallback_answer() {
    let (base_url, server) = serve_once(
        "500 Internal Server Error",
        r#"{"error": {"message": "internal"}}"#.to_string(),
    )
    .await;
    let adapter = GoogleAiAdapter::new(
        LlmConfig::google_ai("test_api_key".to_string()).with_base_url(base_url),
    )
    .unwrap();

    let direct = adapter
        .generate(GenerateRequest::new("q".to_string()))
        .await;
    assert!(matches!(direct, Err(LlmError::ServerError { .. })));
    server.await.unwrap();

    let (base_url, server) = serve_once(
        "500 Internal Server Error",
        r#"{"error": {"message": "internal"}}"#.to_string(),
    )
    .await;
    let adapter = GoogleAiAdapter::new(
        LlmConfig::google_ai("test_api_key".to_string()).with_base_url(base_url),
    )
    .unwrap();
    let generator = AnswerGenerator::new(GenerationBackend::Provider(Arc::new(adapter)));

    let answer = generator
        .generate_answer("What is a gradient?", &["context".to_string()])
        .await;
    assert_eq!(answer.origin, AnswerOrigin::Fallback);
    assert_eq!(answer.answer_text, FALLBACK_ANSWER);
    server.await.unwrap();
}
