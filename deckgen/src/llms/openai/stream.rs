//! SSE stream parsing.

use crate::llms::LlmError;
use crate::stream::{StopReason, StreamChunk};

use super::types::OpenAIStreamChunk;

/// Incremental decoder for a `text/event-stream` body.
///
/// Network chunks respect neither line nor UTF-8 boundaries, so bytes are
/// buffered until their newline arrives.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Creates an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds raw bytes and returns the chunks of every completed line.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Result<StreamChunk, LlmError>> {
        self.buffer.extend_from_slice(bytes);

        let mut results = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            results.extend(parse_sse_line(&String::from_utf8_lossy(&line)));
        }
        results
    }

    /// Flushes a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Vec<Result<StreamChunk, LlmError>> {
        let rest = std::mem::take(&mut self.buffer);
        parse_sse_line(&String::from_utf8_lossy(&rest))
    }
}

/// Parse a single SSE line.
fn parse_sse_line(line: &str) -> Vec<Result<StreamChunk, LlmError>> {
    let line = line.trim();

    // Skip empty lines, comments, and non-data fields
    let Some(data) = line.strip_prefix("data:") else {
        return Vec::new();
    };
    let data = data.trim();

    if data == "[DONE]" {
        return vec![Ok(StreamChunk::done(None))];
    }

    match serde_json::from_str::<OpenAIStreamChunk>(data) {
        Ok(chunk) => convert_chunk(&chunk),
        Err(e) => {
            tracing::warn!(error = %e, data, "Failed to parse SSE chunk");
            Vec::new()
        }
    }
}

/// Convert a wire chunk to our format.
fn convert_chunk(chunk: &OpenAIStreamChunk) -> Vec<Result<StreamChunk, LlmError>> {
    let mut results = Vec::new();

    for choice in &chunk.choices {
        if let Some(content) = &choice.delta.content
            && !content.is_empty()
        {
            results.push(Ok(StreamChunk::text(content)));
        }

        if let Some(tool_calls) = &choice.delta.tool_calls {
            for tc in tool_calls {
                if let (Some(id), Some(func)) = (&tc.id, &tc.function)
                    && let Some(name) = &func.name
                {
                    results.push(Ok(StreamChunk::tool_use_start(tc.index, id, name)));
                }

                if let Some(func) = &tc.function
                    && let Some(args) = &func.arguments
                    && !args.is_empty()
                {
                    results.push(Ok(StreamChunk::tool_use_delta(tc.index, args)));
                }
            }
        }

        if let Some(reason) = &choice.finish_reason {
            results.push(Ok(StreamChunk::done(Some(StopReason::parse(reason)))));
        }
    }

    results
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn text_line(text: &str) -> String {
        format!(
            "data: {{\"choices\":[{{\"index\":0,\"delta\":{{\"content\":\"{text}\"}},\"finish_reason\":null}}]}}\n\n"
        )
    }

    #[test]
    fn test_parse_text_chunk() {
        let mut decoder = SseDecoder::new();
        let results = decoder.push(text_line("Hello").as_bytes());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap(), &StreamChunk::text("Hello"));
    }

    #[test]
    fn test_parse_done() {
        let mut decoder = SseDecoder::new();
        let results = decoder.push(b"data: [DONE]\n");
        assert_eq!(results.len(), 1);
        assert!(results[0].as_ref().unwrap().is_done());
    }

    #[test]
    fn test_line_split_across_network_chunks() {
        let line = text_line("split");
        let (head, tail) = line.split_at(25);

        let mut decoder = SseDecoder::new();
        assert!(decoder.push(head.as_bytes()).is_empty());
        let results = decoder.push(tail.as_bytes());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap().as_text(), Some("split"));
    }

    #[test]
    fn test_multibyte_char_split_across_network_chunks() {
        let line = text_line("Photosynthèse");
        let cut = line.find('è').unwrap() + 1;
        let (head, tail) = line.as_bytes().split_at(cut);

        let mut decoder = SseDecoder::new();
        assert!(decoder.push(head).is_empty());
        let results = decoder.push(tail);
        assert_eq!(results[0].as_ref().unwrap().as_text(), Some("Photosynthèse"));
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: [DONE]").is_empty());
        let results = decoder.finish();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_tool_call_and_finish_reason() {
        let data = r#"data: {"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"id":"call_1","type":"function","function":{"name":"web_search","arguments":"{\"query\":\"leaves\"}"}}]},"finish_reason":"tool_calls"}]}
"#;
        let mut decoder = SseDecoder::new();
        let results: Vec<StreamChunk> = decoder
            .push(data.as_bytes())
            .into_iter()
            .map(Result::unwrap)
            .collect();

        assert_eq!(
            results,
            vec![
                StreamChunk::tool_use_start(0, "call_1", "web_search"),
                StreamChunk::tool_use_delta(0, r#"{"query":"leaves"}"#),
                StreamChunk::done(Some(StopReason::ToolCalls)),
            ]
        );
    }

    #[test]
    fn test_ignores_comments_and_garbage() {
        let mut decoder = SseDecoder::new();
        let results = decoder.push(b": keep-alive\nevent: ping\ndata: {not json}\n");
        assert!(results.is_empty());
    }
}
