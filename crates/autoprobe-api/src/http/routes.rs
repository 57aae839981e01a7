//! HTTP route definitions.

use std::sync::Arc;

use axum::http::Method;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers::{
    exploration_status, explore, get_image, get_report, init, stop_exploration,
};
use crate::state::AppState;

/// Create the control surface router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/init", post(init))
        .route("/explore", post(explore))
        .route("/stop_exploration", post(stop_exploration))
        .route("/exploration_status", get(exploration_status))
        .route("/get_report", get(get_report))
        .route("/get_image", post(get_image))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
