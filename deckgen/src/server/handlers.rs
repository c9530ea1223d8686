//! Request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::{error, warn};

use super::AppState;
use super::caller::CallerId;
use super::types::{ApiError, IpResponse, PresentationResponse, WelcomeResponse};
use crate::request::{PresentationPayload, PresentationRequest};

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Presentation API!".to_owned(),
    })
}

pub async fn caller_ip(CallerId(ip): CallerId) -> Json<IpResponse> {
    Json(IpResponse { ip })
}

/// Generate a deck.
///
/// The rate limit is checked first, so malformed requests also count
/// against the caller's budget.
pub async fn create_presentation(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    payload: Result<Json<PresentationPayload>, JsonRejection>,
) -> Result<Json<PresentationResponse>, ApiError> {
    if let Err(err) = state.limiter.check(&caller) {
        warn!(%caller, "Presentation request rejected by rate limit");
        return Err(err.into());
    }

    let Json(payload) = payload.map_err(|rejection| {
        warn!(%caller, error = %rejection.body_text(), "Unreadable presentation request");
        ApiError::from(rejection)
    })?;

    let request = PresentationRequest::validate(payload, &state.limits).map_err(|err| {
        warn!(%caller, error = %err, "Invalid presentation request");
        ApiError::from(err)
    })?;

    let deck = state.service.create(&request).await.map_err(|err| {
        error!(%caller, error = %err, "Presentation generation failed");
        ApiError::from(err)
    })?;

    Ok(Json(PresentationResponse::new(deck)))
}
