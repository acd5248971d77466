//! Forgiving deserializers for LLM-produced JSON.
//!
//! Models return `null` for empty lists, numbers where strings are expected,
//! and a bare string where a list belongs. These helpers accept all of those
//! shapes instead of failing the whole record.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Renders a scalar JSON value as text. Objects and arrays are serialized.
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Required string: `null` or missing becomes `""`.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(value).unwrap_or_default())
}

/// Optional string: blank text becomes `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(value).and_then(non_blank))
}

/// Optional date string with present/current/now folded into `"Present"`.
pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(normalize_date(opt_string(deserializer)?))
}

/// List of strings: `null` becomes empty, a bare string becomes one item,
/// `null` items are dropped.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(value_to_text)
            .filter_map(non_blank)
            .collect(),
        other => value_to_text(other)
            .and_then(non_blank)
            .into_iter()
            .collect(),
    })
}

/// Either `"a, b"` or `["a", "b"]`, flattened to `"a, b"`.
pub fn joined_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(value_to_text)
            .filter_map(non_blank)
            .collect::<Vec<_>>()
            .join(", "),
        other => value_to_text(other).unwrap_or_default(),
    })
}

/// A nested section that is not an object (null, a string, a list) falls
/// back to its default instead of failing the whole record.
pub fn object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_default())
}

pub fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_string())
    }
}

pub fn is_present_marker(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "present" | "current" | "now"
    )
}

pub fn normalize_date(date: Option<String>) -> Option<String> {
    date.and_then(non_blank).map(|d| {
        if is_present_marker(&d) {
            "Present".to_string()
        } else {
            d
        }
    })
}
