//! Unsplash photo search.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{ImageError, ImageLookup};

const PROVIDER: &str = "unsplash";

#[derive(Debug, Deserialize)]
struct SearchPhotos {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

/// Photo search on Unsplash, returning `urls.regular` of each hit.
#[derive(Clone)]
pub struct UnsplashImages {
    access_key: String,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for UnsplashImages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsplashImages")
            .field("access_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UnsplashImages {
    /// Public API endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.unsplash.com";

    /// Create a client for the public API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(access_key: impl Into<String>, timeout: Duration) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageError::network(PROVIDER, e.to_string()))?;

        Ok(Self {
            access_key: access_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            client,
        })
    }

    /// Point the client at a different endpoint.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    fn search_url(&self, query: &str, per_page: usize) -> String {
        format!(
            "{}/search/photos?query={}&per_page={per_page}&content_filter=high",
            self.base_url,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl ImageLookup for UnsplashImages {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn lookup(&self, hint: &str, count: usize) -> Result<Vec<String>, ImageError> {
        let response = self
            .client
            .get(self.search_url(hint, count.max(1)))
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .send()
            .await
            .map_err(|e| ImageError::from_reqwest(PROVIDER, &e))?;

        if !response.status().is_success() {
            return Err(ImageError::from_response(PROVIDER, response).await);
        }

        let body: SearchPhotos = response
            .json()
            .await
            .map_err(|e| ImageError::from_reqwest(PROVIDER, &e))?;

        Ok(body
            .results
            .into_iter()
            .take(count)
            .map(|photo| photo.urls.regular)
            .collect())
    }
}
