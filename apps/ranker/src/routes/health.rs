use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and the active similarity backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "ranker",
        "similarity_backend": state.engine.backend(),
        "embedding_model": state.config.embedding_model,
        "match_concurrency": state.engine.concurrency()
    }))
}
