//! HTTP surface of the presentation API.
//!
//! Routes, relative to the configured base path:
//!
//! | Method | Path            | Purpose                         |
//! |--------|-----------------|---------------------------------|
//! | GET    | `/`             | welcome message                 |
//! | POST   | `/presentation` | generate a deck (rate limited)  |
//! | GET    | `/ip`           | echo the caller identity        |

mod caller;
mod handlers;
mod types;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{ConfigError, DeckgenConfig, LimitsConfig};
use crate::error::Result;
use crate::rate_limit::RateLimiter;
use crate::service::PresentationService;

pub use caller::CallerId;
pub use types::{ApiError, ErrorResponse, IpResponse, PresentationResponse, WelcomeResponse};

/// How long browsers may cache a preflight answer.
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<PresentationService>,
    limiter: Arc<RateLimiter>,
    limits: LimitsConfig,
    client_ip_header: HeaderName,
}

impl AppState {
    /// Build handler state for `service` using the server settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the client IP header name is invalid.
    pub fn new(service: PresentationService, config: &DeckgenConfig) -> Result<Self> {
        let client_ip_header = HeaderName::from_bytes(config.server.client_ip_header.as_bytes())
            .map_err(|e| {
                ConfigError::InvalidValue(format!(
                    "server.client_ip_header {:?}: {e}",
                    config.server.client_ip_header
                ))
            })?;

        Ok(Self {
            service: Arc::new(service),
            limiter: Arc::new(RateLimiter::per_minute(config.server.rate_limit_per_minute)),
            limits: config.limits,
            client_ip_header,
        })
    }
}

/// Build the application router mounted under `base_path`.
#[must_use]
pub fn router(state: AppState, base_path: &str) -> Router {
    let api = Router::new()
        .route("/", get(handlers::welcome))
        .route("/presentation", post(handlers::create_presentation))
        .route("/ip", get(handlers::caller_ip));

    let base = base_path.trim_end_matches('/');
    let app = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    app.layer(CorsLayer::very_permissive().max_age(CORS_MAX_AGE))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` on `bind` until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the address cannot be bound or the server fails.
pub async fn serve<F>(app: Router, bind: &str, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "Presentation API listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    info!("Presentation API stopped");
    Ok(())
}
