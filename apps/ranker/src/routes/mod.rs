pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::parsing::handlers as parsing;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring
        .route("/api/v1/match", post(matching::handle_match))
        .route("/api/v1/match/batch", post(matching::handle_match_batch))
        // Parsing
        .route("/api/v1/jobs/parse", post(parsing::handle_parse_job))
        .route("/api/v1/resumes/parse", post(parsing::handle_parse_resume))
        .with_state(state)
}
