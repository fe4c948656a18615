use axum::{extract::Multipart, Json};
use chrono::Datelike;

use crate::errors::AppError;
use crate::matching::{JobRequirement, ResumeProfile};
use crate::parsing::jd_parser::{parse_job, parse_job_json};
use crate::parsing::resume_parser::parse_resume_bytes;

/// POST /api/v1/jobs/parse
/// Body is a job posting record; explicit fields win over derived ones.
pub async fn handle_parse_job(body: String) -> Result<Json<JobRequirement>, AppError> {
    let posting = parse_job_json(&body)?;
    Ok(Json(parse_job(&posting)))
}

/// POST /api/v1/resumes/parse
/// Expects a multipart form with one file field (any name); the file name
/// selects the decoder.
pub async fn handle_parse_resume(
    mut multipart: Multipart,
) -> Result<Json<ResumeProfile>, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let file_name = field
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation("Uploaded field has no file name".to_string()))?;
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

    let current_year = chrono::Local::now().year();
    // PDF extraction is CPU-bound; keep it off the async executor.
    let profile =
        tokio::task::spawn_blocking(move || parse_resume_bytes(&data, &file_name, current_year))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in resume parse: {e}"))
            })??;

    Ok(Json(profile))
}
