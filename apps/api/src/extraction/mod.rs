//! Resume text extraction from uploaded files.
//!
//! PDF and .docx parsing is CPU-bound and synchronous, so both run inside `spawn_blocking`.

mod docx;
pub mod handlers;

use bytes::Bytes;
use thiserror::Error;

use crate::errors::AppError;

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "tex"];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid file type: .{0} (allowed: {})", ALLOWED_EXTENSIONS.join(", "))]
    UnsupportedType(String),

    #[error("Text extraction from .{0} files is not supported; upload a PDF, .docx or .tex file")]
    NoExtractor(String),

    #[error("File is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not read Word document: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    /// Legacy binary Word format; accepted by the upload check but not readable.
    Doc,
    Tex,
}

impl DocumentKind {
    /// Classifies an upload by its extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "doc" => Ok(DocumentKind::Doc),
            "tex" => Ok(DocumentKind::Tex),
            _ => Err(ExtractionError::UnsupportedType(extension)),
        }
    }
}

/// Extracts plain text from an uploaded resume.
pub async fn extract_text(data: Bytes, filename: &str) -> Result<String, AppError> {
    match DocumentKind::from_filename(filename)? {
        DocumentKind::Tex => Ok(String::from_utf8(data.to_vec()).map_err(ExtractionError::from)?),
        DocumentKind::Pdf => {
            let text = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&data)
                    .map_err(|e| ExtractionError::Pdf(e.to_string()))
            })
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))??;
            Ok(text)
        }
        DocumentKind::Docx => {
            let text = tokio::task::spawn_blocking(move || docx::extract_docx_text(data))
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Word extraction task failed: {e}"))
                })??;
            Ok(text)
        }
        DocumentKind::Doc => Err(ExtractionError::NoExtractor("doc".to_string()).into()),
    }
}
