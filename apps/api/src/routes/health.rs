use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service status plus the defaults new evaluations run with.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ranker-api",
        "version": env!("CARGO_PKG_VERSION"),
        "engine": state.config.engine,
        "deterministic_profile": state.config.deterministic_profile,
        "relevance_threshold": state.config.relevance_threshold,
    }))
}
