//! Recovery of JSON objects from model output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([}\]])").expect("valid trailing comma regex"));

/// Strips markdown fences and surrounding prose, keeping the outermost
/// `{ ... }` span when one exists.
pub fn clean_json_response(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.trim_end().strip_suffix("```").unwrap_or(text).trim();

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Parses `text` as a JSON object. Arrays and scalars are rejected.
pub fn parse_object(text: &str) -> Result<Value, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("expected a JSON object"))
    }
}

/// Last-chance repair: single quotes become double quotes and trailing
/// commas before `}` / `]` are removed.
pub fn repair_json(text: &str) -> Option<Value> {
    let swapped = text.replace('\'', "\"");
    let repaired = TRAILING_COMMA.replace_all(&swapped, "$1");
    parse_object(&repaired).ok()
}
