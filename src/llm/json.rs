//! JSON extraction and lenient parsing of backend replies.
//!
//! Language models frequently wrap JSON in markdown fences, surround it with
//! prose, or ignore the requested format entirely. Nothing here fails: a
//! reply that cannot be interpreted yields no messages.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ResponseError;
use crate::llm::response::FileMessage;

static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?i:json)[ \t]*\r?\n?(.*?)```").expect("JSON fence pattern is valid")
});

/// Return the inner content of the first ` ```json ` fenced block, trimmed.
///
/// Pure text scan; the content is not validated.
pub fn extract_json_block(text: &str) -> Option<String> {
    JSON_FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Parse a JSON object of path → message pairs, keeping the reply's key order.
///
/// Entries whose value is not a non-empty string are skipped.
pub fn try_parse_json_to_map(json: &str) -> Result<Vec<FileMessage>, ResponseError> {
    let value: Value = serde_json::from_str(json).map_err(ResponseError::Malformed)?;

    let map = match value {
        Value::Object(map) => map,
        other => return Err(ResponseError::NotAnObject(kind(&other))),
    };

    let mut messages = Vec::with_capacity(map.len());
    for (path, message) in map {
        match message {
            _ if path.is_empty() => warn!("Ignoring message with an empty path"),
            Value::String(m) if !m.trim().is_empty() => {
                messages.push(FileMessage::new(path, m.trim()));
            }
            other => warn!(
                "Ignoring entry for '{}': expected a non-empty message, found {}",
                path,
                kind(&other)
            ),
        }
    }

    Ok(messages)
}

/// Lenient form of [`try_parse_json_to_map`]: any error yields an empty list.
pub fn parse_json_to_map(json: &str) -> Vec<FileMessage> {
    match try_parse_json_to_map(json) {
        Ok(messages) => messages,
        Err(e) => {
            debug!("Discarding unparseable commit messages: {}", e);
            Vec::new()
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a blank string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_block_strips_fence() {
        let input = "pre\n```json\n{\"a\":\"b\"}\n```\npost";
        assert_eq!(extract_json_block(input).as_deref(), Some(r#"{"a":"b"}"#));
    }

    #[test]
    fn test_extract_json_block_is_idempotent() {
        let input = "some text\n```json\n{\"key\": \"value\"}\n```\nmore text";
        let first = extract_json_block(input);
        let second = extract_json_block(input);
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some(r#"{"key": "value"}"#));
    }

    #[test]
    fn test_extract_json_block_none_without_fence() {
        assert_eq!(extract_json_block("no json here"), None);
        assert_eq!(extract_json_block(r#"{"a": "b"}"#), None);
        assert_eq!(extract_json_block("```\n{\"a\": \"b\"}\n```"), None);
    }

    #[test]
    fn test_extract_json_block_unterminated_fence() {
        assert_eq!(extract_json_block("```json\n{\"a\": \"b\"}"), None);
    }

    #[test]
    fn test_extract_json_block_takes_first_block() {
        let input = "```json\n{\"a\": \"1\"}\n```\nand\n```json\n{\"b\": \"2\"}\n```";
        assert_eq!(extract_json_block(input).as_deref(), Some(r#"{"a": "1"}"#));
    }

    #[test]
    fn test_extract_json_block_uppercase_tag() {
        let input = "```JSON\n{\"a\": \"b\"}\n```";
        assert_eq!(extract_json_block(input).as_deref(), Some(r#"{"a": "b"}"#));
    }

    #[test]
    fn test_extract_json_block_empty_block() {
        assert_eq!(extract_json_block("```json\n```").as_deref(), Some(""));
    }

    #[test]
    fn test_parse_json_to_map_valid() {
        let messages = parse_json_to_map(r#"{"file1.py": "feat: add new feature"}"#);
        assert_eq!(messages, vec![FileMessage::new("file1.py", "feat: add new feature")]);
    }

    #[test]
    fn test_parse_json_to_map_preserves_key_order() {
        let messages = parse_json_to_map(r#"{"z.txt": "m1", "a.txt": "m2"}"#);
        let paths: Vec<&str> = messages.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["z.txt", "a.txt"]);
    }

    #[test]
    fn test_parse_json_to_map_invalid_is_empty() {
        assert!(parse_json_to_map("invalid json").is_empty());
        assert!(matches!(
            try_parse_json_to_map("invalid json"),
            Err(ResponseError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_json_to_map_non_object_is_empty() {
        assert!(parse_json_to_map(r#"["feat: a", "fix: b"]"#).is_empty());
        assert!(matches!(
            try_parse_json_to_map(r#""just a string""#),
            Err(ResponseError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_parse_json_to_map_skips_non_string_and_blank_values() {
        let messages = parse_json_to_map(
            r#"{"a.txt": "feat: a", "b.txt": 42, "c.txt": "   ", "d.txt": {"msg": "x"}, "": "fix: nameless"}"#,
        );
        assert_eq!(messages, vec![FileMessage::new("a.txt", "feat: a")]);
    }

    #[test]
    fn test_parse_json_to_map_trims_messages() {
        let messages = parse_json_to_map(r#"{"a.txt": "  fix: typo\n"}"#);
        assert_eq!(messages[0].message, "fix: typo");
    }
}
