//! Unified error types for deckgen.
//!
//! [`Error`] covers every way a presentation request can fail:
//! - request validation and rate limiting (caller errors)
//! - malformed model output
//! - generation provider failures and timeouts
//!
//! Image lookup failures are deliberately absent: they are contained per slide
//! (see [`crate::enrich`]) and never reach this type.

use axum::http::StatusCode;

use crate::config::ConfigError;
use crate::llms::LlmError;

/// Result type alias for deckgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for deckgen.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The request body is missing fields or has out-of-range values.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The caller exceeded its request quota.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// The model answer could not be coerced into a slide deck.
    #[error("Model output is not a valid slide deck: {reason}")]
    MalformedOutput {
        /// Why parsing failed.
        reason: String,
        /// The complete text returned by the model.
        raw: String,
    },

    /// Generation provider error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The agent kept calling tools without producing an answer.
    #[error("Agent stopped after {max_steps} steps without a final answer")]
    MaxSteps {
        /// The configured step budget.
        max_steps: usize,
    },

    /// An upstream operation exceeded its deadline.
    #[error("{operation} timed out after {secs}s")]
    Timeout {
        /// What was being waited on.
        operation: &'static str,
        /// The deadline in seconds.
        secs: u64,
    },

    /// A provider client could not be initialised.
    #[error("Failed to initialise {provider}: {message}")]
    Setup {
        /// Provider being set up.
        provider: &'static str,
        /// Error description.
        message: String,
    },

    /// Configuration or credential error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a malformed output error carrying the raw model text.
    #[must_use]
    pub fn malformed_output(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedOutput {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Create a max steps error.
    #[must_use]
    pub const fn max_steps(max_steps: usize) -> Self {
        Self::MaxSteps { max_steps }
    }

    /// Create a timeout error.
    #[must_use]
    pub const fn timeout(operation: &'static str, secs: u64) -> Self {
        Self::Timeout { operation, secs }
    }

    /// Create a provider setup error.
    #[must_use]
    pub fn setup(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Setup {
            provider,
            message: message.into(),
        }
    }

    /// HTTP status this error maps to at the API boundary.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` if the caller, not an upstream system, is at fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::RateLimited)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_unprocessable() {
        let err = Error::validation("number_of_slides must be at least 1");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.is_client_error());
        assert!(err.to_string().contains("number_of_slides"));
    }

    #[test]
    fn rate_limited_maps_to_429() {
        let err = Error::RateLimited;
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert!(err.to_string().contains("Rate limit"));
    }

    #[test]
    fn malformed_output_keeps_raw_text() {
        let err = Error::malformed_output("expected value at line 1", "Sorry, I can't.");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_client_error());
        match err {
            Error::MalformedOutput { raw, .. } => assert_eq!(raw, "Sorry, I can't."),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn llm_error_converts() {
        fn inner() -> std::result::Result<(), LlmError> {
            Err(LlmError::network("connection reset"))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert!(matches!(err, Error::Llm(LlmError::Network(_))));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn timeout_display() {
        let err = Error::timeout("generation stream", 120);
        assert_eq!(err.to_string(), "generation stream timed out after 120s");
    }
}
