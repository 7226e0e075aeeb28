//! Data frame payload parsing and delta extraction.
//!
//! Payloads follow the chat-completion chunk shape:
//!
//! ```json
//! {"choices":[{"delta":{"content":"Hel"}}]}
//! ```
//!
//! Every level is optional. Frames without a delta (role announcements,
//! usage metadata, heartbeats) are legal and simply carry no text.

use serde_json::Value;

/// Payload value that ends the stream.
pub const TERMINAL_SENTINEL: &str = "[DONE]";

/// Result of parsing one data frame payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadOutcome {
    /// The terminal sentinel; no more data follows.
    Terminal,
    /// Well-formed JSON payload.
    Parsed(Value),
    /// Well-formed JSON reporting an upstream failure.
    ServerError(String),
    /// Not valid JSON. Usually a payload cut in two by an embedded line break.
    Malformed(String),
}

/// Parse a data frame payload.
pub fn parse_payload(payload: &str) -> PayloadOutcome {
    if payload == TERMINAL_SENTINEL {
        return PayloadOutcome::Terminal;
    }

    match serde_json::from_str::<Value>(payload) {
        Ok(value) => match server_error_message(&value) {
            Some(message) => PayloadOutcome::ServerError(message),
            None => PayloadOutcome::Parsed(value),
        },
        Err(e) => PayloadOutcome::Malformed(e.to_string()),
    }
}

/// Extract the incremental text fragment at `choices[0].delta.content`.
///
/// Returns the fragment verbatim; whitespace is significant. Empty fragments
/// count as absent.
pub fn extract_delta(payload: &Value) -> Option<&str> {
    payload
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
        .filter(|s| !s.is_empty())
}

/// Finish reason of the first choice, when the server sends one.
pub fn finish_reason(payload: &Value) -> Option<&str> {
    payload
        .get("choices")?
        .get(0)?
        .get("finish_reason")?
        .as_str()
}

/// Detect `{"error": {"message": ...}}` or `{"error": "..."}` payloads.
fn server_error_message(value: &Value) -> Option<String> {
    let error = value.get("error")?;
    if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
        return Some(message.to_string());
    }
    if let Some(message) = error.as_str() {
        return Some(message.to_string());
    }
    if error.is_null() {
        return None;
    }
    Some(error.to_string())
}
