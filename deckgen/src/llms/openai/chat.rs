//! Streaming chat completions.

use std::pin::Pin;

use async_stream::stream;
use futures::{Stream, StreamExt};

use crate::llms::LlmError;
use crate::message::Message;
use crate::stream::StreamChunk;
use crate::tool::ToolDefinition;

use super::client::OpenAI;
use super::stream::SseDecoder;

/// A stream of chat completion chunks.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, LlmError>> + Send>>;

impl OpenAI {
    /// Start a streaming chat completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the provider answers
    /// with a non-success status. Errors after the stream has started are
    /// yielded as stream items.
    pub async fn chat_stream(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatStream, LlmError> {
        let url = self.chat_url();
        let body = self.build_body(messages, tools);

        tracing::debug!(
            model = %body.model,
            messages = body.messages.len(),
            tools = tools.len(),
            "Sending streaming chat request"
        );

        let response = self.build_request(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text));
        }

        let mut bytes = Box::pin(response.bytes_stream());
        let parsed = stream! {
            let mut decoder = SseDecoder::new();
            while let Some(chunk) = bytes.next().await {
                match chunk {
                    Ok(data) => {
                        for item in decoder.push(&data) {
                            yield item;
                        }
                    }
                    Err(e) => {
                        yield Err(LlmError::stream(e.to_string()));
                        return;
                    }
                }
            }
            for item in decoder.finish() {
                yield item;
            }
        };

        Ok(Box::pin(parsed))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::TryStreamExt;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::llms::OpenAIConfig;

    fn client(server: &MockServer) -> OpenAI {
        OpenAI::new(OpenAIConfig::new("test-key").with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn streams_text_chunks() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"},\"finish_reason\":null}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("test-key"))
            .and(body_partial_json(serde_json::json!({"stream": true})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .expect(1)
            .mount(&server)
            .await;

        let chunks: Vec<StreamChunk> = client(&server)
            .chat_stream(&[Message::user("hi")], &[])
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        let text: String = chunks.iter().filter_map(StreamChunk::as_text).collect();
        assert_eq!(text, "Hello");
        assert!(chunks.last().unwrap().is_done());
    }

    #[tokio::test]
    async fn maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"error":{"message":"Incorrect API key","type":"auth"}}"#),
            )
            .mount(&server)
            .await;

        let Err(err) = client(&server)
            .chat_stream(&[Message::user("hi")], &[])
            .await
        else {
            unreachable!("expected an auth error");
        };
        assert!(matches!(err, LlmError::Auth { .. }));
    }
}
