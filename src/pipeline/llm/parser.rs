use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::models::{ChatReply, InsightsPayload};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").unwrap());

/// Strip a markdown code fence, if the text carries one.
pub fn extract_json_block(text: &str) -> &str {
    match FENCED_BLOCK.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text.trim(),
    }
}

/// Structural check on a decoded reply: an object with an `insights` array
/// of objects and a string `summary`.
pub fn validate_insight_response(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    let Some(insights) = object.get("insights").and_then(Value::as_array) else {
        return false;
    };
    if !object.get("summary").is_some_and(Value::is_string) {
        return false;
    }
    insights.iter().all(Value::is_object)
}

/// Interpret raw model output.
///
/// A reply that decodes to a valid insights payload becomes
/// `ChatReply::Insights`; anything else is surfaced as prose.
pub fn parse_reply(text: &str) -> ChatReply {
    let candidate = extract_json_block(text);

    let value: Value = match serde_json::from_str(candidate) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Model reply is not JSON, treating as text");
            return text_reply(text);
        }
    };

    if !validate_insight_response(&value) {
        tracing::debug!("Model reply JSON does not match the insights format");
        return text_reply(text);
    }

    match serde_json::from_value::<InsightsPayload>(value) {
        Ok(payload) => payload.into(),
        Err(e) => {
            tracing::warn!(error = %e, "Insights payload failed to decode");
            text_reply(text)
        }
    }
}

fn text_reply(text: &str) -> ChatReply {
    ChatReply::Text {
        content: text.trim().to_string(),
    }
}
