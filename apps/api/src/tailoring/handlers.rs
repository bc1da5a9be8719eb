//! Axum route handlers for the Tailoring API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::improvements::{apply_improvements, suggest_improvements};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub suggestions: String,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    /// Raw (not base64) LaTeX, ready to be sent to `/convert/latex`.
    pub tex_content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /resume/suggest-improvements
pub async fn handle_suggest_improvements(
    State(state): State<AppState>,
    body: Result<Json<SuggestRequest>, JsonRejection>,
) -> Result<Json<SuggestResponse>, AppError> {
    let Json(request) = body.map_err(|_| AppError::Validation("No JSON data provided.".to_string()))?;

    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation("No job description provided.".to_string()));
    }
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("No resume text provided.".to_string()));
    }

    let suggestions =
        suggest_improvements(&request.resume_text, &request.job_description, state.llm.as_ref())
            .await?;
    Ok(Json(SuggestResponse { suggestions }))
}

/// POST /resume/apply-improvements
pub async fn handle_apply_improvements(
    State(state): State<AppState>,
    body: Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<Json<ApplyResponse>, AppError> {
    let Json(request) = body.map_err(|_| AppError::Validation("No JSON data provided".to_string()))?;

    if request.resume_text.trim().is_empty() || request.suggestions.trim().is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }

    let tex_content =
        apply_improvements(&request.resume_text, &request.suggestions, state.llm.as_ref()).await?;
    Ok(Json(ApplyResponse { tex_content }))
}
