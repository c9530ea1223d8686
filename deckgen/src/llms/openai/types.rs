//! Chat Completions API wire types.
//!
//! Internal serialization types; the rest of the crate works with
//! [`Message`](crate::message::Message) and [`StreamChunk`](crate::stream::StreamChunk).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIChatRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OpenAITool>>,
    pub stream: bool,
}

/// Message format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// Tool definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAITool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: OpenAIFunction,
}

/// Function definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Tool call in an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: OpenAIFunctionCall,
}

/// Function call details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIFunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Streaming chunk.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIStreamChunk {
    #[serde(default)]
    pub choices: Vec<OpenAIStreamChoice>,
}

/// Stream choice.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIStreamChoice {
    #[serde(default)]
    pub delta: OpenAIStreamDelta,
    pub finish_reason: Option<String>,
}

/// Stream delta.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAIStreamDelta {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<OpenAIStreamToolCall>>,
}

/// Stream tool call delta.
///
/// Gemini omits `index` for single calls.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIStreamToolCall {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub id: Option<String>,
    pub function: Option<OpenAIStreamFunctionCall>,
}

/// Stream function call delta.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIStreamFunctionCall {
    pub name: Option<String>,
    pub arguments: Option<String>,
}

/// Error response body.
///
/// Gemini wraps errors in a one-element array; both shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OpenAIErrorResponse {
    Single { error: OpenAIError },
    List(Vec<OpenAIErrorWrapper>),
}

/// Array element of a list-shaped error response.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIErrorWrapper {
    pub error: OpenAIError,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<Value>,
}

impl OpenAIErrorResponse {
    /// Returns the first error in the body.
    pub fn into_error(self) -> Option<OpenAIError> {
        match self {
            Self::Single { error } => Some(error),
            Self::List(list) => list.into_iter().next().map(|w| w.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_skips_empty_fields() {
        let request = OpenAIChatRequest {
            model: "gemini-2.0-flash".to_owned(),
            messages: vec![OpenAIMessage {
                role: "user".to_owned(),
                content: Some("Hello".to_owned()),
                tool_calls: None,
                tool_call_id: None,
            }],
            temperature: None,
            tools: None,
            stream: true,
        };

        let json = serde_json::to_value(&request).expect("serialization should succeed");
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["content"], "Hello");
        assert!(json.get("tools").is_none());
        assert!(json["messages"][0].get("tool_call_id").is_none());
    }

    #[test]
    fn test_stream_chunk_without_index() {
        let json = r#"{"choices":[{"delta":{"tool_calls":[{"id":"c1","type":"function","function":{"name":"web_search","arguments":"{}"}}]},"finish_reason":"tool_calls"}]}"#;
        let chunk: OpenAIStreamChunk = serde_json::from_str(json).expect("should parse");
        let calls = chunk.choices[0].delta.tool_calls.as_ref().expect("tool calls");
        assert_eq!(calls[0].index, 0);
        assert_eq!(calls[0].id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_error_response_shapes() {
        let single = r#"{"error":{"message":"bad key","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        let list = r#"[{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}]"#;

        let a: OpenAIErrorResponse = serde_json::from_str(single).expect("single");
        let b: OpenAIErrorResponse = serde_json::from_str(list).expect("list");
        assert_eq!(a.into_error().expect("error").message, "bad key");
        assert_eq!(b.into_error().expect("error").message, "API key not valid");
    }
}
