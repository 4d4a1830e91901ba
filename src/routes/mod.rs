//! Route definitions for the regex validation service.

pub mod health;
pub mod presale;
pub mod settings;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, "Invalid FRONTEND_URL, allowing any origin");
            CorsLayer::new().allow_origin(Any)
        }
    }
    .allow_methods(Any)
    .allow_headers(Any);

    let control_routes = Router::new()
        .route(
            "/control/event/{organizer}/{event}/settings/regex-validation/",
            get(settings::show).post(settings::update),
        )
        .route(
            "/control/event/{organizer}/{event}/nav",
            get(settings::navigation),
        );

    let presale_routes = Router::new()
        .route(
            "/presale/{organizer}/{event}/forms/{kind}/overrides",
            get(presale::overrides),
        )
        .route(
            "/presale/{organizer}/{event}/forms/{kind}/validate",
            post(presale::validate),
        );

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .merge(control_routes)
        .nest("/api/v1", presale_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
