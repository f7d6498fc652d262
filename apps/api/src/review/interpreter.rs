//! Response interpreter — two-stage defensive JSON recovery.
//!
//! Completion services in JSON-object mode occasionally prepend stray
//! commentary or whitespace despite instruction. Stage one is a strict
//! parse of the whole string; stage two recovers a trailing JSON object
//! (first `{` to end of string). Nothing else is repaired.

use serde_json::Value;

use crate::errors::AppError;

/// Parses the raw model output into a JSON object, or fails with
/// `InvalidResponseFormat` carrying the original text.
pub fn interpret(raw: &str) -> Result<Value, AppError> {
    let text = strip_json_fences(raw);

    // Stage 1: strict parse of the entire string
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Ok(value);
        }
    }

    // Stage 2: recover a trailing object preceded by noise
    if let Some(candidate) = trailing_json_object(text) {
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            if value.is_object() {
                return Ok(value);
            }
        }
    }

    Err(AppError::InvalidResponseFormat {
        raw: raw.to_string(),
    })
}

/// Returns the substring from the first `{` to the end of the string
/// (trailing whitespace trimmed), provided it still ends with `}`.
/// Trailing prose after the object is deliberately not repaired.
fn trailing_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let tail = text[start..].trim_end();
    tail.ends_with('}').then_some(tail)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or_else(|| stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or_else(|| stripped.trim_start())
    } else {
        text
    }
}
