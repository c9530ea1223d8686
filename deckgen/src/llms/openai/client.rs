//! Chat completions HTTP client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::llms::LlmError;
use crate::message::{Message, Role};
use crate::tool::ToolDefinition;

use super::config::OpenAIConfig;
use super::types::{
    OpenAIChatRequest, OpenAIErrorResponse, OpenAIFunction, OpenAIFunctionCall, OpenAIMessage,
    OpenAITool, OpenAIToolCall,
};

const PROVIDER: &str = "openai";

/// OpenAI-compatible API client.
///
/// Cheap to clone; the HTTP connection pool and configuration are shared.
#[derive(Debug, Clone)]
pub struct OpenAI {
    pub(crate) config: Arc<OpenAIConfig>,
    pub(crate) client: Client,
}

impl OpenAI {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Auth`] if the API key is empty, or
    /// [`LlmError::Internal`] if the HTTP client cannot be built.
    pub fn new(config: OpenAIConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::auth(PROVIDER, "API key is required"));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Get the configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build the chat completions URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Build an authenticated JSON POST request.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
    }

    /// Convert a transcript message to wire format.
    pub(crate) fn convert_message(msg: &Message) -> OpenAIMessage {
        let tool_calls = (!msg.tool_calls.is_empty()).then(|| {
            msg.tool_calls
                .iter()
                .map(|tc| OpenAIToolCall {
                    id: tc.id.clone(),
                    call_type: "function".to_owned(),
                    function: OpenAIFunctionCall {
                        name: tc.name.clone(),
                        arguments: tc.arguments.clone(),
                    },
                })
                .collect()
        });

        OpenAIMessage {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
            tool_calls,
            tool_call_id: if msg.role == Role::Tool {
                msg.tool_call_id.clone()
            } else {
                None
            },
        }
    }

    /// Convert a tool definition to wire format.
    pub(crate) fn convert_tool(tool: &ToolDefinition) -> OpenAITool {
        OpenAITool {
            tool_type: "function".to_owned(),
            function: OpenAIFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        }
    }

    /// Build a streaming request body.
    pub(crate) fn build_body(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> OpenAIChatRequest {
        OpenAIChatRequest {
            model: self.config.model.clone(),
            messages: messages.iter().map(Self::convert_message).collect(),
            temperature: self.config.temperature,
            tools: (!tools.is_empty()).then(|| tools.iter().map(Self::convert_tool).collect()),
            stream: true,
        }
    }

    /// Parse an error response body.
    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        let parsed = serde_json::from_str::<OpenAIErrorResponse>(body)
            .ok()
            .and_then(OpenAIErrorResponse::into_error);

        let Some(error) = parsed else {
            return LlmError::http_status(status, body.to_owned());
        };

        match status {
            401 | 403 => LlmError::auth(PROVIDER, error.message),
            429 => LlmError::rate_limited(PROVIDER),
            _ => {
                let code = error
                    .code
                    .map(|c| c.as_str().map_or_else(|| c.to_string(), str::to_owned))
                    .or(error.status)
                    .or(error.error_type)
                    .unwrap_or_else(|| status.to_string());
                LlmError::provider_code(PROVIDER, code, error.message)
            }
        }
    }
}
