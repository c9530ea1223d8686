//! Errors from the chat completions backend.
//!
//! Every [`LlmError`] aborts the presentation request it belongs to; there
//! are no retries.

/// Chat completions failure.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum LlmError {
    /// The API key was missing or rejected.
    #[error("[{provider}] {message}")]
    Auth {
        /// Backend that refused the key.
        provider: &'static str,
        /// Error description.
        message: String,
    },

    /// The backend throttled us.
    #[error("[{provider}] Rate limit exceeded. Please retry after some time.")]
    RateLimited {
        /// Backend that throttled.
        provider: &'static str,
    },

    /// The request never got an answer.
    #[error("{0}")]
    Network(String),

    /// The event stream broke off or carried garbage.
    #[error("{0}")]
    Stream(String),

    /// Non-success status without a structured error body.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Structured error object returned by the backend.
    #[error("[{provider}] {code}: {message}")]
    Provider {
        /// Backend name.
        provider: &'static str,
        /// Error code, status name or HTTP status.
        code: String,
        /// Error description.
        message: String,
    },

    /// The client could not be set up.
    #[error("{0}")]
    Internal(String),
}

impl LlmError {
    /// Create an authentication error.
    #[must_use]
    pub fn auth(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Auth {
            provider,
            message: message.into(),
        }
    }

    /// Create a throttling error.
    #[must_use]
    pub const fn rate_limited(provider: &'static str) -> Self {
        Self::RateLimited { provider }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a streaming error.
    #[must_use]
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream(message.into())
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a provider error.
    #[must_use]
    pub fn provider_code(
        provider: &'static str,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a setup error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else if err.is_body() || err.is_decode() {
            Self::stream(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}
