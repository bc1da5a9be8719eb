use axum::{
    extract::{multipart::MultipartRejection, Multipart},
    http::{header, HeaderMap},
    Json,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentKind};

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

/// POST /resume/extract-text
///
/// Accepts a multipart upload with a `file` field (.pdf, .doc, .docx or .tex).
pub async fn handle_extract_text(
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractTextResponse>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !content_type.starts_with("multipart/form-data") {
        warn!(content_type, "Rejected upload with invalid content type");
        return Err(AppError::UnsupportedMediaType("Invalid content type".to_string()));
    }

    let mut multipart =
        multipart.map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(AppError::Validation("Empty filename".to_string()));
        }
        // Reject by extension before buffering the body.
        DocumentKind::from_filename(&filename)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        debug!(filename = %filename, bytes = data.len(), "Processing uploaded file");

        let text = extract_text(data, &filename).await?;
        debug!(filename = %filename, chars = text.len(), "Extracted text from upload");
        return Ok(Json(ExtractTextResponse { text }));
    }

    Err(AppError::Validation("No file in request".to_string()))
}
