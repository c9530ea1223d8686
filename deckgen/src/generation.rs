//! Generation client abstraction.
//!
//! A [`GenerationClient`] takes one instruction and answers with a finite
//! stream of [`GenerationChunk`]s. Only text chunks carry the answer; tool
//! activity is surfaced for logging and otherwise ignored.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};

use crate::error::{Error, Result};

/// A stream of generation chunks.
pub type GenerationStream = Pin<Box<dyn Stream<Item = Result<GenerationChunk>> + Send>>;

/// One increment of an agent run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationChunk {
    /// Incremental answer text.
    Text(String),
    /// The agent decided to call a tool.
    ToolCall {
        /// Tool name.
        name: String,
    },
    /// A tool finished.
    ToolResult {
        /// Tool name.
        name: String,
        /// Whether the tool succeeded.
        ok: bool,
    },
    /// The agent produced its final answer.
    Done,
}

impl GenerationChunk {
    /// Create a text chunk.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// The text content, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Produces slide deck text from an instruction.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Start a run for one instruction.
    ///
    /// # Errors
    ///
    /// Returns an error if the run cannot be started. Failures after that are
    /// yielded as stream items.
    async fn stream(&self, instruction: &str) -> Result<GenerationStream>;
}

/// Drain a generation stream into the concatenated answer text.
///
/// Non-text chunks are skipped. The whole drain shares one deadline.
///
/// # Errors
///
/// Returns the first error yielded by the stream, or [`Error::Timeout`] when
/// the deadline passes first.
pub async fn collect_text(mut stream: GenerationStream, deadline: Duration) -> Result<String> {
    let drain = async {
        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            match chunk? {
                GenerationChunk::Text(s) => text.push_str(&s),
                GenerationChunk::ToolCall { name } => {
                    tracing::debug!(tool = %name, "Agent calling tool");
                }
                GenerationChunk::ToolResult { name, ok } => {
                    tracing::debug!(tool = %name, ok, "Tool finished");
                }
                GenerationChunk::Done => {}
            }
        }
        Ok(text)
    };

    tokio::time::timeout(deadline, drain)
        .await
        .map_err(|_| Error::timeout("generation stream", deadline.as_secs()))?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::llms::LlmError;

    fn boxed(items: Vec<Result<GenerationChunk>>) -> GenerationStream {
        Box::pin(futures::stream::iter(items))
    }

    #[tokio::test]
    async fn concatenates_only_text() {
        let stream = boxed(vec![
            Ok(GenerationChunk::ToolCall {
                name: "web_search".into(),
            }),
            Ok(GenerationChunk::ToolResult {
                name: "web_search".into(),
                ok: true,
            }),
            Ok(GenerationChunk::text("{\"title\":")),
            Ok(GenerationChunk::text("\"x\"}")),
            Ok(GenerationChunk::Done),
        ]);

        let text = collect_text(stream, Duration::from_secs(1)).await.unwrap();
        assert_eq!(text, "{\"title\":\"x\"}");
    }

    #[tokio::test]
    async fn propagates_stream_errors() {
        let stream = boxed(vec![
            Ok(GenerationChunk::text("partial")),
            Err(Error::Llm(LlmError::stream("connection reset"))),
        ]);

        let err = collect_text(stream, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_on_stalled_stream() {
        let stream: GenerationStream = Box::pin(futures::stream::pending());
        let err = collect_text(stream, Duration::from_secs(120))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Timeout {
                operation: "generation stream",
                secs: 120
            }
        ));
    }
}
