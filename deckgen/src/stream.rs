//! Streaming chunk types for chat completions.
//!
//! Provider SSE payloads are decoded into [`StreamChunk`]s. The agent loop feeds
//! them through a [`StreamAggregator`] to rebuild one model turn.

use std::collections::BTreeMap;

use crate::message::ToolCall;

/// One decoded server-sent event of a chat completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// Answer text.
    Text(String),

    /// The model opened a tool call.
    ToolUseStart {
        /// Provider-assigned position of the call.
        index: usize,
        /// Call id echoed back in the tool message.
        id: String,
        /// Requested tool.
        name: String,
    },

    /// A fragment of a call's JSON arguments.
    ToolUseDelta {
        /// Position of the call being extended.
        index: usize,
        /// Raw argument text.
        partial_json: String,
    },

    /// End of the model turn.
    Done {
        /// Finish reason, when the provider sent one.
        stop_reason: Option<StopReason>,
    },
}

impl StreamChunk {
    /// Text chunk.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Tool call opening chunk.
    #[must_use]
    pub fn tool_use_start(index: usize, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::ToolUseStart {
            index,
            id: id.into(),
            name: name.into(),
        }
    }

    /// Tool argument fragment.
    #[must_use]
    pub fn tool_use_delta(index: usize, partial_json: impl Into<String>) -> Self {
        Self::ToolUseDelta {
            index,
            partial_json: partial_json.into(),
        }
    }

    /// End-of-turn chunk.
    #[must_use]
    pub const fn done(stop_reason: Option<StopReason>) -> Self {
        Self::Done { stop_reason }
    }

    /// The text, for text chunks.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this chunk ends the turn.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

/// Why the model ended its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The answer is complete.
    Stop,
    /// Cut off by the token limit.
    Length,
    /// The model wants tool output first.
    ToolCalls,
    /// Blocked by the provider's safety filter.
    ContentFilter,
}

impl StopReason {
    /// Parse a finish reason.
    ///
    /// Gemini's compatibility layer reports upper-case reasons such as `STOP`
    /// and `MAX_TOKENS`; unknown reasons count as a normal stop.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "length" | "max_tokens" => Self::Length,
            "tool_calls" | "function_call" => Self::ToolCalls,
            "content_filter" | "safety" => Self::ContentFilter,
            _ => Self::Stop,
        }
    }

    /// Whether the answer was cut off.
    #[must_use]
    pub const fn is_truncated(self) -> bool {
        matches!(self, Self::Length)
    }
}

/// Rebuilds one model turn from its stream chunks.
#[derive(Debug, Clone, Default)]
pub struct StreamAggregator {
    text: String,
    tool_calls: BTreeMap<usize, ToolCallBuilder>,
    /// Provider index to the slot of the most recent call started with it.
    slots: BTreeMap<usize, usize>,
    next_index: usize,
    stop_reason: Option<StopReason>,
}

#[derive(Debug, Clone, Default)]
struct ToolCallBuilder {
    id: String,
    name: String,
    arguments: String,
}

impl StreamAggregator {
    /// Creates a new aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a stream chunk to the aggregator.
    pub fn apply(&mut self, chunk: &StreamChunk) {
        match chunk {
            StreamChunk::Text(text) => self.text.push_str(text),
            StreamChunk::ToolUseStart { index, id, name } => {
                // Some providers number every call 0; keep them apart.
                let slot = if self.tool_calls.contains_key(index) {
                    self.next_index.max(*index + 1)
                } else {
                    *index
                };
                self.next_index = self.next_index.max(slot + 1);
                self.slots.insert(*index, slot);
                self.tool_calls.insert(
                    slot,
                    ToolCallBuilder {
                        id: id.clone(),
                        name: name.clone(),
                        arguments: String::new(),
                    },
                );
            }
            StreamChunk::ToolUseDelta {
                index,
                partial_json,
            } => {
                let slot = self.slots.get(index).copied().unwrap_or(*index);
                if let Some(tc) = self.tool_calls.get_mut(&slot) {
                    tc.arguments.push_str(partial_json);
                }
            }
            StreamChunk::Done { stop_reason } => {
                // `[DONE]` carries no reason; keep the one from finish_reason.
                if stop_reason.is_some() {
                    self.stop_reason = *stop_reason;
                }
            }
        }
    }

    /// Returns the accumulated text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the stop reason, if the turn has finished.
    #[must_use]
    pub const fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Returns `true` if any tool calls have been started.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Builds the final tool calls in index order.
    #[must_use]
    pub fn build_tool_calls(&self) -> Vec<ToolCall> {
        self.tool_calls
            .values()
            .map(|tc| ToolCall::new(&tc.id, &tc.name, &tc.arguments))
            .collect()
    }
}
