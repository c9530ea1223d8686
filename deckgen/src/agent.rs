//! Tool-calling agent over a streaming chat completions endpoint.
//!
//! Each step streams one model turn. If the turn requests tools they are run,
//! their output is appended to the transcript and the next step begins. A turn
//! without tool calls is the final answer.

use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::generation::{GenerationChunk, GenerationClient, GenerationStream};
use crate::llms::OpenAI;
use crate::message::{Message, ToolCall};
use crate::stream::{StopReason, StreamAggregator, StreamChunk};
use crate::tool::{Tool, ToolDefinition, ToolError};

/// Streaming agent that implements [`GenerationClient`].
#[derive(Debug, Clone)]
pub struct Agent {
    llm: OpenAI,
    tools: Vec<Arc<dyn Tool>>,
    max_steps: usize,
}

impl Agent {
    /// Default cap on model turns per run.
    pub const DEFAULT_MAX_STEPS: usize = 6;

    /// Create an agent without tools.
    #[must_use]
    pub const fn new(llm: OpenAI) -> Self {
        Self {
            llm,
            tools: Vec::new(),
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }

    /// Register a tool.
    #[must_use]
    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set the maximum number of model turns.
    #[must_use]
    pub const fn max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    /// Names of the registered tools.
    #[must_use]
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Run one requested tool call.
    async fn execute(&self, call: &ToolCall) -> std::result::Result<String, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == call.name)
            .ok_or_else(|| ToolError::not_found(&call.name))?;

        let args: Value = if call.arguments.trim().is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(&call.arguments)?
        };

        tool.call(args).await
    }

    // `try_stream!` trips `tail_expr_drop_order` under edition 2024.
    #[allow(tail_expr_drop_order)]
    fn run(self, instruction: String) -> impl Stream<Item = Result<GenerationChunk>> + Send {
        try_stream! {
            let definitions: Vec<ToolDefinition> =
                self.tools.iter().map(|t| t.definition()).collect();
            let mut messages = vec![Message::user(instruction)];

            info!(
                model = %self.llm.model(),
                tools = ?self.tool_names(),
                max_steps = self.max_steps,
                "Agent run started",
            );

            for step in 1..=self.max_steps {
                debug!(step, messages = messages.len(), "Starting agent step");

                let mut chunks = self.llm.chat_stream(&messages, &definitions).await?;
                let mut aggregator = StreamAggregator::new();

                while let Some(chunk) = chunks.next().await {
                    let chunk = chunk?;
                    if let StreamChunk::Text(delta) = &chunk {
                        yield GenerationChunk::Text(delta.clone());
                    }
                    aggregator.apply(&chunk);
                }

                if !aggregator.has_tool_calls() {
                    if aggregator.stop_reason().is_some_and(StopReason::is_truncated) {
                        warn!(step, "Model answer was truncated by the token limit");
                    }
                    debug!(step, chars = aggregator.text().len(), "Agent produced final answer");
                    yield GenerationChunk::Done;
                    return;
                }

                let calls = aggregator.build_tool_calls();
                messages.push(Message::assistant_tool_calls(aggregator.text(), calls.clone()));

                for call in calls {
                    yield GenerationChunk::ToolCall { name: call.name.clone() };

                    let output = self.execute(&call).await;
                    let ok = output.is_ok();
                    let content = output.unwrap_or_else(|e| {
                        warn!(tool = %call.name, error = %e, "Tool call failed");
                        format!("Error: {e}")
                    });
                    messages.push(Message::tool(&call.id, content));

                    yield GenerationChunk::ToolResult { name: call.name, ok };
                }
            }

            let err = Error::max_steps(self.max_steps);
            error!(error = %err, max_steps = self.max_steps, "Agent exceeded its step budget");
            Err(err)?;
        }
    }
}

#[async_trait]
impl GenerationClient for Agent {
    async fn stream(&self, instruction: &str) -> Result<GenerationStream> {
        Ok(Box::pin(self.clone().run(instruction.to_owned())))
    }
}
