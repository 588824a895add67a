//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the ad API and the health check under a single Axum
//! router. CORS is open because the billboard UI may be served from another
//! origin; every request is traced.

pub mod ads;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full HTTP application.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ads/active", get(ads::active_ads))
        .route("/api/ads/user", get(ads::user_ads))
        .route("/api/ads/submit", post(ads::submit_ad))
        .route("/api/ads/update", put(ads::update_ad))
        .route("/api/ads/delete", delete(ads::delete_ad))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
