//! Recovery of the JSON deck from free-form model text.
//!
//! Models often wrap JSON in markdown fences and surround it with prose. The
//! payload is located with a fixed precedence:
//!
//! 1. the body of the first fence tagged `json`;
//! 2. otherwise the body of the first untagged fence;
//! 3. otherwise the whole text.
//!
//! An unterminated fence runs to the end of the text. The result is trimmed
//! and parsed strictly.

use crate::deck::GeneratedDeck;
use crate::error::{Error, Result};

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Locate the JSON payload inside model text.
///
/// Never fails; text without fences is returned trimmed.
#[must_use]
pub fn extract_json_payload(text: &str) -> &str {
    let body = if let Some(start) = text.find(JSON_FENCE) {
        fenced_body(&text[start + JSON_FENCE.len()..])
    } else if let Some(start) = text.find(FENCE) {
        fenced_body(&text[start + FENCE.len()..])
    } else {
        text
    };
    body.trim()
}

/// Text up to the next fence, or all of it.
fn fenced_body(rest: &str) -> &str {
    rest.find(FENCE).map_or(rest, |end| &rest[..end])
}

/// Parse model text into a deck.
///
/// # Errors
///
/// Returns [`Error::MalformedOutput`] carrying the full text when the payload
/// is not a JSON object with a `title` string and a `slides` array of
/// `{title, content}` objects.
pub fn parse_deck(raw: &str) -> Result<GeneratedDeck> {
    let payload = extract_json_payload(raw);
    if payload.is_empty() {
        return Err(Error::malformed_output("model returned no content", raw));
    }

    serde_json::from_str(payload).map_err(|e| Error::malformed_output(e.to_string(), raw))
}
