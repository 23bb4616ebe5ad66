//! Lenient parsing of the service's JSON answer.
//!
//! The answer is untrusted: schema adherence is requested but not assumed.
//! Missing or mistyped fields fall back to empty values instead of failing.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Ink2TextError, Result};
use crate::models::extraction::{ExtractionResult, Item};

/// Parse the response text into an [`ExtractionResult`].
///
/// Blank text is [`Ink2TextError::EmptyResponse`]; anything that is not a
/// JSON object is [`Ink2TextError::MalformedResponse`].
pub fn parse_extraction(text: &str) -> Result<ExtractionResult> {
    if text.trim().is_empty() {
        return Err(Ink2TextError::EmptyResponse);
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| Ink2TextError::MalformedResponse(e.to_string()))?;

    let Value::Object(object) = value else {
        return Err(Ink2TextError::MalformedResponse(
            "API returned an unexpected format".to_string(),
        ));
    };

    let items = match object.get("items") {
        Some(Value::Array(entries)) => entries.iter().filter_map(item_from_value).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            debug!("Ignoring non-array items field: {}", other);
            Vec::new()
        }
    };

    Ok(ExtractionResult {
        header_text: string_field(&object, "headerText"),
        items,
        footer_text: string_field(&object, "footerText"),
    })
}

fn item_from_value(value: &Value) -> Option<Item> {
    match value {
        Value::Object(entry) => Some(Item {
            item: string_field(entry, "item"),
            rate: string_field(entry, "rate"),
        }),
        other => {
            debug!("Skipping malformed item entry: {}", other);
            None
        }
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
