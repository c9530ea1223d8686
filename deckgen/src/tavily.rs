//! Tavily search API client.
//!
//! Shared by the agent's [`WebSearchTool`](crate::tools::WebSearchTool) and the
//! [`web_search`](crate::images::TavilyImages) image source.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Default Tavily API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Error type for Tavily requests.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum TavilyError {
    /// Network or connection error.
    #[error("Tavily request failed: {0}")]
    Network(String),

    /// Non-success HTTP status.
    #[error("Tavily returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Response body could not be decoded.
    #[error("Unexpected Tavily response: {0}")]
    Response(String),
}

impl From<reqwest::Error> for TavilyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Response(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Search request body.
#[derive(Debug, Clone, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'static str,
    include_images: bool,
    include_image_descriptions: bool,
}

/// A single web result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Page URL.
    pub url: String,
    /// Extracted snippet.
    #[serde(default)]
    pub content: String,
}

/// An image result.
///
/// Tavily returns bare URLs unless image descriptions were requested.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageResult {
    /// Plain image URL.
    Url(String),
    /// URL with a generated description.
    Described {
        /// Image URL.
        url: String,
        /// Description of the image.
        #[serde(default)]
        description: Option<String>,
    },
}

impl ImageResult {
    /// The image URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) | Self::Described { url, .. } => url,
        }
    }
}

/// Search response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Web results, best first.
    #[serde(default)]
    pub results: Vec<SearchResult>,
    /// Image results, when requested.
    #[serde(default)]
    pub images: Vec<ImageResult>,
}

/// Tavily API client.
///
/// Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone)]
pub struct TavilyClient {
    api_key: Arc<str>,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for TavilyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TavilyClient {
    /// Create a client for the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, TavilyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TavilyError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            api_key: Arc::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_owned(),
            client,
        })
    }

    /// Point the client at a different endpoint.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Run a web search.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        include_images: bool,
    ) -> Result<SearchResponse, TavilyError> {
        let body = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results,
            search_depth: "advanced",
            include_images,
            include_image_descriptions: include_images,
        };

        tracing::debug!(query, max_results, include_images, "Tavily search");

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TavilyError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> TavilyClient {
        TavilyClient::new("tvly-test", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn search_sends_key_and_parses_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(serde_json::json!({
                "api_key": "tvly-test",
                "query": "photosynthesis",
                "include_images": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": "photosynthesis",
                "results": [
                    {"title": "Photosynthesis", "url": "https://example.org/p", "content": "Light to sugar", "score": 0.9}
                ],
                "images": [
                    {"url": "https://img.example.org/leaf.png", "description": "A leaf"},
                    "https://img.example.org/sun.png"
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .search("photosynthesis", 3, true)
            .await
            .unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].url, "https://example.org/p");
        let urls: Vec<&str> = response.images.iter().map(ImageResult::url).collect();
        assert_eq!(
            urls,
            ["https://img.example.org/leaf.png", "https://img.example.org/sun.png"]
        );
    }

    #[tokio::test]
    async fn search_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let err = client(&server).search("x", 1, false).await.unwrap_err();
        assert!(matches!(err, TavilyError::HttpStatus { status: 401, .. }));
    }

    #[test]
    fn debug_redacts_key() {
        let client = TavilyClient::new("tvly-secret", Duration::from_secs(1)).unwrap();
        assert!(!format!("{client:?}").contains("tvly-secret"));
    }
}
