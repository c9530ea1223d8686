//! Image results from Tavily web search.

use async_trait::async_trait;

use super::{ImageError, ImageLookup};
use crate::tavily::{ImageResult, TavilyClient};

/// Web image search through Tavily's `include_images` option.
#[derive(Debug, Clone)]
pub struct TavilyImages {
    client: TavilyClient,
}

impl TavilyImages {
    /// Wrap a Tavily client.
    #[must_use]
    pub const fn new(client: TavilyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageLookup for TavilyImages {
    fn provider_name(&self) -> &'static str {
        "web_search"
    }

    async fn lookup(&self, hint: &str, count: usize) -> Result<Vec<String>, ImageError> {
        // Image hits scale with max_results; over-fetch so one is likely.
        let response = self.client.search(hint, count.max(5), true).await?;

        Ok(response
            .images
            .iter()
            .map(ImageResult::url)
            .filter(|url| !url.is_empty())
            .take(count)
            .map(str::to_owned)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn source(server: &MockServer) -> TavilyImages {
        let client = TavilyClient::new("tvly-test", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri());
        TavilyImages::new(client)
    }

    #[tokio::test]
    async fn returns_first_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(serde_json::json!({"include_images": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [],
                "images": [
                    {"url": "https://img/1.png", "description": "one"},
                    {"url": "https://img/2.png", "description": "two"}
                ]
            })))
            .mount(&server)
            .await;

        let urls = source(&server).lookup("chloroplast", 1).await.unwrap();
        assert_eq!(urls, ["https://img/1.png"]);
    }

    #[tokio::test]
    async fn missing_images_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
            .mount(&server)
            .await;

        assert!(source(&server).lookup("x", 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = source(&server).lookup("x", 1).await.unwrap_err();
        assert!(matches!(err, ImageError::HttpStatus { status: 500, .. }));
    }
}
