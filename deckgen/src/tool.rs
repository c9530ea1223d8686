//! Tool abstraction for the generation agent.
//!
//! Tools are exposed to the model through function calling. The agent runs
//! them between model turns and feeds their output back as tool messages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema of a tool as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// What the tool does, written for the model.
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a new tool definition.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Error type for tool execution failures.
///
/// Tool errors never abort a request: the agent reports them to the model as
/// the tool's output and lets it continue.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    /// Error during tool execution.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Invalid arguments provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The model called a tool that is not registered.
    #[error("Tool not found: {0}")]
    NotFound(String),
}

impl ToolError {
    /// Create an execution error.
    #[must_use]
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}

/// A tool the agent can call.
#[async_trait]
pub trait Tool: Send + Sync + std::fmt::Debug {
    /// Name used in function calls.
    fn name(&self) -> &'static str;

    /// Schema advertised to the model.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool with JSON arguments and return text for the model.
    async fn call(&self, args: Value) -> Result<String, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_new() {
        let def = ToolDefinition::new("echo", "Echo input", serde_json::json!({"type": "object"}));
        assert_eq!(def.name, "echo");
        assert!(def.parameters.is_object());
    }

    #[test]
    fn serde_error_is_invalid_arguments() {
        let err: ToolError = serde_json::from_str::<Value>("{")
            .map_err(ToolError::from)
            .expect_err("invalid json");
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(ToolError::not_found("x").to_string().contains('x'));
    }
}
