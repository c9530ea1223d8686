//! Image sources for slide illustrations.
//!
//! Each source implements [`ImageLookup`]: given a hint it returns zero or
//! more image references, best first. Failures are reported as
//! [`ImageError`] and are contained per slide by the
//! [`Enricher`](crate::enrich::Enricher).

mod generate;
mod unsplash;
mod web_search;

pub use generate::GeminiImages;
pub use unsplash::UnsplashImages;
pub use web_search::TavilyImages;

use async_trait::async_trait;

use crate::tavily::TavilyError;

/// Error type for image lookups.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ImageError {
    /// Network or connection error.
    #[error("{provider} request failed: {message}")]
    Network {
        /// Image source name.
        provider: &'static str,
        /// Error description.
        message: String,
    },

    /// Non-success HTTP status.
    #[error("{provider} returned HTTP {status}: {body}")]
    HttpStatus {
        /// Image source name.
        provider: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Response body did not have the expected shape.
    #[error("{provider} response could not be decoded: {message}")]
    Response {
        /// Image source name.
        provider: &'static str,
        /// Error description.
        message: String,
    },
}

impl ImageError {
    /// Create a network error.
    #[must_use]
    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    /// Create a response format error.
    #[must_use]
    pub fn response(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Response {
            provider,
            message: message.into(),
        }
    }

    /// Classify a transport error.
    #[must_use]
    pub fn from_reqwest(provider: &'static str, err: &reqwest::Error) -> Self {
        if err.is_decode() {
            Self::response(provider, err.to_string())
        } else {
            Self::network(provider, err.to_string())
        }
    }

    /// Read a non-success response into an error.
    pub(crate) async fn from_response(provider: &'static str, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Self::HttpStatus {
            provider,
            status,
            body,
        }
    }
}

impl From<TavilyError> for ImageError {
    fn from(err: TavilyError) -> Self {
        const PROVIDER: &str = "tavily";
        match err {
            TavilyError::HttpStatus { status, body } => Self::HttpStatus {
                provider: PROVIDER,
                status,
                body,
            },
            TavilyError::Response(message) => Self::response(PROVIDER, message),
            other => Self::network(PROVIDER, other.to_string()),
        }
    }
}

/// Resolves an image hint to image references.
#[async_trait]
pub trait ImageLookup: Send + Sync + std::fmt::Debug {
    /// Short source name for logs.
    fn provider_name(&self) -> &'static str;

    /// Look up at most `count` images for `hint`.
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or provider failure.
    async fn lookup(&self, hint: &str, count: usize) -> Result<Vec<String>, ImageError>;
}

/// Source that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

#[async_trait]
impl ImageLookup for NoImages {
    fn provider_name(&self) -> &'static str {
        "none"
    }

    async fn lookup(&self, _hint: &str, _count: usize) -> Result<Vec<String>, ImageError> {
        Ok(Vec::new())
    }
}
