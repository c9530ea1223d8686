//! Web search tool for grounding slide content.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tavily::{SearchResult, TavilyClient};
use crate::tool::{Tool, ToolDefinition, ToolError};

/// Web search backed by Tavily.
#[derive(Debug, Clone)]
pub struct WebSearchTool {
    client: TavilyClient,
    /// Maximum number of results to return.
    pub max_results: usize,
}

/// Arguments for web search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchArgs {
    /// The search query to perform.
    pub query: String,
}

impl WebSearchTool {
    /// Tool name advertised to the model.
    pub const NAME: &'static str = "web_search";

    /// Create a new web search tool.
    #[must_use]
    pub const fn new(client: TavilyClient) -> Self {
        Self {
            client,
            max_results: 10,
        }
    }

    /// Set maximum results.
    #[must_use]
    pub const fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Render results as markdown.
    fn format_results(results: &[SearchResult]) -> String {
        let mut output = String::from("## Search Results\n\n");
        for result in results {
            output.push_str(&format!(
                "[{}]({})\n{}\n\n",
                result.title, result.url, result.content
            ));
        }
        output
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "Performs a web search for a query and returns the top search results formatted as markdown.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query to perform"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: WebSearchArgs = serde_json::from_value(args)?;
        if args.query.trim().is_empty() {
            return Err(ToolError::InvalidArguments("query must not be empty".to_owned()));
        }

        let response = self
            .client
            .search(&args.query, self.max_results, false)
            .await
            .map_err(|e| ToolError::execution(e.to_string()))?;

        if response.results.is_empty() {
            return Err(ToolError::execution(
                "No results found! Try a less restrictive/shorter query.",
            ));
        }

        Ok(Self::format_results(&response.results))
    }
}
