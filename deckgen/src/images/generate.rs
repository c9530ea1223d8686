//! Image generation with Gemini's native `generateContent` API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ImageError, ImageLookup};

const PROVIDER: &str = "gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl InlineData {
    fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Generates one illustration per hint and returns it as a `data:` URI.
#[derive(Clone)]
pub struct GeminiImages {
    api_key: String,
    base_url: String,
    model: String,
    client: Client,
}

impl std::fmt::Debug for GeminiImages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiImages")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiImages {
    /// Native Gemini API endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";
    /// Default image-capable model.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.0-flash-exp-image-generation";

    /// Create a client for the public API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageError::network(PROVIDER, e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            client,
        })
    }

    /// Point the client at a different endpoint.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Use a different model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageLookup for GeminiImages {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn lookup(&self, hint: &str, count: usize) -> Result<Vec<String>, ImageError> {
        let prompt = format!("Generate an image for this description: {hint}");
        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [TextPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["TEXT", "IMAGE"],
            },
        };

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageError::from_reqwest(PROVIDER, &e))?;

        if !response.status().is_success() {
            return Err(ImageError::from_response(PROVIDER, response).await);
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ImageError::from_reqwest(PROVIDER, &e))?;

        Ok(body
            .candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| &c.parts)
            .filter_map(|p| p.inline_data.as_ref())
            .take(count)
            .map(InlineData::to_data_uri)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn source(server: &MockServer) -> GeminiImages {
        GeminiImages::new("g-key", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn returns_inline_image_as_data_uri() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/models/gemini-2.0-flash-exp-image-generation:generateContent",
            ))
            .and(header("x-goog-api-key", "g-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"parts": [{"text": "Generate an image for this description: a sunny leaf"}]}],
                "generationConfig": {"responseModalities": ["TEXT", "IMAGE"]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [
                        {"text": "Here is your image"},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                    ]}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uris = source(&server).lookup("a sunny leaf", 1).await.unwrap();
        assert_eq!(uris, ["data:image/png;base64,iVBORw0KGgo="]);
    }

    #[tokio::test]
    async fn text_only_answer_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "I cannot draw that"}]}}]
            })))
            .mount(&server)
            .await;

        assert!(source(&server).lookup("x", 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = source(&server).lookup("x", 1).await.unwrap_err();
        assert!(matches!(
            err,
            ImageError::HttpStatus {
                provider: "gemini",
                status: 400,
                ..
            }
        ));
    }
}
