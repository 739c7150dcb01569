pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profiles
        .route("/api/v1/profiles", get(handlers::handle_list_profiles))
        .route(
            "/api/v1/profiles/:engine/weights",
            put(handlers::handle_update_weights),
        )
        // Scoring
        .route("/api/v1/extract", post(handlers::handle_extract))
        .route(
            "/api/v1/evaluations",
            post(handlers::handle_create_evaluation),
        )
        .route("/api/v1/metrics", post(handlers::handle_compute_metrics))
        .with_state(state)
}
