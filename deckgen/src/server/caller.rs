//! Caller identity for rate limiting.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderName;
use axum::http::request::Parts;

use super::AppState;

/// Identity of the caller: the first address in the trusted client IP
/// header, else the peer IP, else `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerId(pub String);

impl CallerId {
    /// Identify the sender of `parts`.
    #[must_use]
    pub fn identify(parts: &Parts, trusted_header: &HeaderName) -> Self {
        if let Some(value) = parts.headers.get(trusted_header)
            && let Ok(value) = value.to_str()
            && let Some(first) = value.split(',').map(str::trim).find(|v| !v.is_empty())
        {
            return Self(first.to_owned());
        }

        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            return Self(addr.ip().to_string());
        }

        Self("unknown".to_owned())
    }
}

impl FromRequestParts<AppState> for CallerId {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::identify(parts, &state.client_ip_header))
    }
}
