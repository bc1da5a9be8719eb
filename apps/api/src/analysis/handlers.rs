//! Axum route handlers for the Analysis API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::analysis::job::{analyze_job_description, JobAnalysis};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    #[serde(default)]
    pub job_description: String,
}

/// POST /analyze/job
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeJobRequest>, JsonRejection>,
) -> Result<Json<JobAnalysis>, AppError> {
    let Json(request) = body.map_err(|_| AppError::Validation("No JSON data provided.".to_string()))?;

    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation("No job description provided.".to_string()));
    }

    let analysis = analyze_job_description(&request.job_description, state.llm.as_ref()).await?;
    Ok(Json(analysis))
}
