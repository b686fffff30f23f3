//! Prompt and response text helpers shared by the agents.

use serde::Serialize;
use serde_json::{Map, Value};

/// First `max_chars` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Serialize `value` to JSON for a prompt, cut to `max_chars` characters.
pub fn prompt_json<T: Serialize + ?Sized>(value: &T, max_chars: usize) -> String {
    let json = serde_json::to_string(value).unwrap_or_default();
    truncate_chars(&json, max_chars).to_string()
}

/// Remove a surrounding markdown code fence from an LLM reply.
///
/// The opening fence line (including any language tag) is dropped, as is
/// everything from the last closing fence onward. Text without a leading
/// fence is only trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    if !text.starts_with("```") {
        return text;
    }

    let body = match text.find('\n') {
        Some(newline) => &text[newline + 1..],
        None => &text[3..],
    };

    match body.rfind("```") {
        Some(close) => &body[..close],
        None => body,
    }
}

/// Parse an LLM reply as JSON after stripping any code fence.
pub fn parse_json(text: &str) -> Option<Value> {
    serde_json::from_str(strip_code_fence(text)).ok()
}

/// Pull a JSON object out of an LLM reply.
///
/// Tries the fence-stripped reply first, then the outermost `{ ... }` span,
/// which recovers replies that wrap the object in prose.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    if let Some(Value::Object(map)) = parse_json(text) {
        return Some(map);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }

    match serde_json::from_str(&text[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 0), "");
        // Multi-byte characters count as one each.
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("🎙️🎧📻", 1), "🎙");
    }

    #[test]
    fn test_prompt_json_truncates() {
        let value = json!({"title": "Housing on the north side"});
        assert_eq!(prompt_json(&value, 10), r#"{"title":""#);
        assert_eq!(prompt_json(&value, 1000), r#"{"title":"Housing on the north side"}"#);
    }

    #[test]
    fn test_strip_fence_with_language_tag() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(text), "{\"a\": 1}\n");
    }

    #[test]
    fn test_strip_fence_without_newline() {
        assert_eq!(strip_code_fence("```{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fence_unterminated() {
        assert_eq!(strip_code_fence("```\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_no_fence_is_trimmed() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_json() {
        assert_eq!(parse_json("```\n[1, 2]\n```"), Some(json!([1, 2])));
        assert_eq!(parse_json("not json"), None);
    }

    #[test]
    fn test_extract_object_from_prose() {
        let text = "Here is the analysis:\n{\"story_angles\": []}\nLet me know!";
        let map = extract_json_object(text).unwrap();
        assert!(map.contains_key("story_angles"));
    }

    #[test]
    fn test_extract_object_rejects_non_objects() {
        assert!(extract_json_object("[1, 2, 3]").is_none());
        assert!(extract_json_object("} nothing {").is_none());
        assert!(extract_json_object("no braces at all").is_none());
    }
}
