//! Locates a JSON payload inside free-form model output.
//!
//! Models wrap JSON in prose, markdown fences, or both. This module only finds
//! the boundaries of the payload; deciding what to do with bad JSON is left to
//! the caller.

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::IgnoredAny;

lazy_static! {
    static ref FENCED_BLOCK: Regex =
        Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?(.*?)```").expect("valid fence regex");
}

/// Return the first JSON array or object in `text`.
///
/// Shorthand for the first item of [`json_payload_candidates`].
pub fn extract_json_payload(text: &str) -> Option<&str> {
    json_payload_candidates(text).next()
}

/// Every balanced JSON array or object in `text` that is valid JSON.
///
/// Fenced code blocks come first. After them every `[` or `{` in the whole
/// text is tried as a start position, in order, skipping brackets inside
/// string literals. Callers pick the first candidate with the shape they need,
/// so stray brackets in prose do not hide the real payload.
pub fn json_payload_candidates(text: &str) -> impl Iterator<Item = &str> + '_ {
    let fenced = FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .flat_map(|inner| balanced_payloads(inner.as_str()));

    fenced
        .chain(balanced_payloads(text))
        .filter(|candidate| serde_json::from_str::<IgnoredAny>(candidate).is_ok())
}

fn balanced_payloads(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.match_indices(['[', '{'])
        .filter_map(move |(start, _)| balanced_payload(&text[start..]))
}

fn balanced_payload(text: &str) -> Option<&str> {
    let start = text.find(['[', '{'])?;
    let bytes = text.as_bytes();

    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' => stack.push(b']'),
            b'{' => stack.push(b'}'),
            b']' | b'}' => {
                if stack.pop() != Some(byte) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}
