use panda::models::TaskPriority;
use panda::services::tasks::{parse_tasks, TaskParseError};
use panda::utils::{extract_json_payload, json_payload_candidates};

#[test]
fn test_fenced_block_with_language_tag() {
    let text = "Sure, here you go:\n```json\n[{\"title\": \"Read\"}]\n```\nLet me know!";
    assert_eq!(extract_json_payload(text), Some("[{\"title\": \"Read\"}]"));
}

#[test]
fn test_fence_wins_over_earlier_brackets() {
    let text = "Tasks [draft] below\n```\n{\"tasks\": []}\n```";
    assert_eq!(extract_json_payload(text), Some("{\"tasks\": []}"));
}

#[test]
fn test_fence_without_payload_falls_back_to_scan() {
    let text = "```\nno json in here\n```\nBut here: [1, 2, 3]";
    assert_eq!(extract_json_payload(text), Some("[1, 2, 3]"));
}

#[test]
fn test_nested_structures_and_escapes() {
    let text = r#"Result: {"tasks": [{"title": "say \"hi\" [now]", "tags": ["a", "b"]}]} done"#;
    assert_eq!(
        extract_json_payload(text),
        Some(r#"{"tasks": [{"title": "say \"hi\" [now]", "tags": ["a", "b"]}]}"#)
    );
}

#[test]
fn test_mismatched_closer_is_rejected() {
    assert_eq!(extract_json_payload("[{\"a\": 1]}"), None);
}

#[test]
fn test_parse_tasks_from_prose() {
    let output = "I suggest the following:\n[{\"title\": \"Review notes\", \"description\": \"Skim slides\", \"priority\": \"High\"}]\nGood luck!";
    let tasks = parse_tasks(output).unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Review notes");
    assert_eq!(tasks[0].description, "Skim slides");
    assert_eq!(tasks[0].priority, TaskPriority::High);
}

#[test]
fn test_parse_tasks_defaults_unknown_priority() {
    let tasks = parse_tasks(r#"[{"title": "Practice", "priority": 3}]"#).unwrap();
    assert_eq!(tasks[0].priority, TaskPriority::Medium);
}

#[test]
fn test_parse_tasks_failures() {
    assert!(matches!(parse_tasks("nothing"), Err(TaskParseError::NoPayload)));
    assert!(matches!(
        parse_tasks(r#"{"items": 3}"#),
        Err(TaskParseError::InvalidJson(_))
    ));
    assert!(matches!(parse_tasks("[]"), Err(TaskParseError::Empty)));
    assert!(matches!(
        parse_tasks(r#"[{"description": "no title"}]"#),
        Err(TaskParseError::Empty)
    ));
}

#[test]
fn test_bracketed_prose_before_payload() {
    let output = "Here are the tasks (see [1] for notes):\n[{\"title\":\"Read ch 3\",\"description\":\"Chapter on backprop\",\"priority\":\"high\"}]";

    let candidates: Vec<&str> = json_payload_candidates(output).collect();
    assert_eq!(candidates[0], "[1]");

    let tasks = parse_tasks(output).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Read ch 3");
    assert_eq!(tasks[0].priority, TaskPriority::High);
}

#[test]
fn test_invalid_json_in_prose_is_skipped() {
    let text = "Use {curly braces} carefully: {\"tasks\": [{\"title\": \"Practice\"}]}";
    assert_eq!(
        extract_json_payload(text),
        Some("{\"tasks\": [{\"title\": \"Practice\"}]}")
    );
}
