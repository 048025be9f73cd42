//! Response extraction - pulls a JSON document out of raw model output
//!
//! Models are instructed to reply with bare JSON but routinely wrap it in
//! markdown code fences. Extraction is a best-effort unwrap of one fenced
//! block around the whole document; fences embedded mid-document or left
//! unbalanced are not repaired, and any residual syntax error surfaces as
//! [`GridError::MalformedResponse`]. Callers own the diagnostic logging of
//! failing text.

use crate::core::error::{GridError, Result};
use serde_json::{Map, Value};

/// Strip a surrounding markdown code fence, if present.
///
/// Handles an opening fence with or without the `json` language tag and a
/// closing fence, each independently optional.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse raw model output into a JSON object after fence stripping.
///
/// Fails with [`GridError::MalformedResponse`] carrying the offending
/// text when the remainder is not a JSON object.
pub fn extract(raw: &str) -> Result<Map<String, Value>> {
    let text = strip_fences(raw);

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(GridError::MalformedResponse {
            reason: format!("expected a JSON object, got {}", json_type_name(&other)),
            text: text.to_string(),
        }),
        Err(e) => Err(GridError::MalformedResponse {
            reason: e.to_string(),
            text: text.to_string(),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
