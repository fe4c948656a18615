use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::engine::{BatchEntry, BatchSubmission};
use crate::matching::profile::{JobRequirement, ResumeProfile};
use crate::matching::result::MatchResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub resume_id: Option<String>,
    pub resume: ResumeProfile,
    pub job: JobRequirement,
}

#[derive(Debug, Deserialize)]
pub struct BatchResume {
    pub resume_id: String,
    pub resume: ResumeProfile,
}

#[derive(Debug, Deserialize)]
pub struct BatchMatchRequest {
    pub resumes: Vec<BatchResume>,
    pub job: JobRequirement,
}

#[derive(Debug, Serialize)]
pub struct BatchMatchResponse {
    pub results: Vec<BatchEntry>,
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let resume_id = req
        .resume_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| req.resume.name.trim().to_string());
    let result = state.engine.score(&resume_id, &req.resume, &req.job).await;
    Ok(Json(result))
}

/// POST /api/v1/match/batch
pub async fn handle_match_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchMatchRequest>,
) -> Result<Json<BatchMatchResponse>, AppError> {
    if req.resumes.is_empty() {
        return Err(AppError::Validation(
            "Batch must contain at least one resume".to_string(),
        ));
    }

    let submissions = req
        .resumes
        .into_iter()
        .map(|item| BatchSubmission {
            resume_id: item.resume_id,
            resume: Ok(item.resume),
        })
        .collect();

    let results = state
        .engine
        .score_batch(Arc::new(req.job), submissions)
        .await;
    Ok(Json(BatchMatchResponse { results }))
}
