//! Response bodies and error mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::deck::SlideDeck;
use crate::error::Error;

/// Body of `GET {base}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    /// Greeting.
    pub message: String,
}

/// Body of `GET {base}/ip`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpResponse {
    /// Caller identity used for rate limiting.
    pub ip: String,
}

/// Successful `POST {base}/presentation` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationResponse {
    /// Always `true`.
    pub success: bool,
    /// The generated deck.
    pub presentation: SlideDeck,
}

impl PresentationResponse {
    /// Wrap a deck.
    #[must_use]
    pub const fn new(presentation: SlideDeck) -> Self {
        Self {
            success: true,
            presentation,
        }
    }
}

/// Failure body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// What went wrong.
    pub error: String,
}

/// An error ready to be sent to the caller.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// The HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = err.status_code();
        let message = if err.is_client_error() {
            err.to_string()
        } else {
            format!("Error processing the request: {err}")
        };
        Self { status, message }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: format!("Invalid request: {}", rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_prefixed() {
        let err = ApiError::from(Error::malformed_output("EOF while parsing", "raw"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.starts_with("Error processing the request: "));
    }

    #[test]
    fn client_errors_keep_their_message() {
        let err = ApiError::from(Error::RateLimited);
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.message, "Rate limit exceeded. Please try again later.");

        let err = ApiError::from(Error::validation("number_of_slides must be between 1 and 20, got 0"));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
