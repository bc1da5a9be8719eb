//! Axum route handlers for the Conversion API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::latex::diagnostics::summarize_errors;
use crate::latex::validation::MarkupError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConvertLatexRequest {
    #[serde(default)]
    pub latex_content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConvertLatexResponse {
    pub tex_content: String,
    pub pdf_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CompileFailure>,
}

#[derive(Debug, Serialize)]
pub struct CompileFailure {
    pub code: &'static str,
    pub message: &'static str,
    /// Raw toolchain output from the failing pass.
    pub diagnostic: String,
    /// Error lines picked out of `diagnostic`.
    pub errors: Vec<String>,
}

/// POST /convert/latex
///
/// 200 with both documents on success. 206 with the source and the toolchain's
/// diagnostic when the document did not compile, so the user can fix and resubmit.
pub async fn handle_convert_latex(
    State(state): State<AppState>,
    body: Result<Json<ConvertLatexRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ConvertLatexResponse>), AppError> {
    let latex_content = body
        .ok()
        .and_then(|Json(req)| req.latex_content)
        .ok_or_else(|| AppError::Validation(MarkupError::Empty.to_string()))?;
    debug!(bytes = latex_content.len(), "Received LaTeX for conversion");

    let result = state.compiler.compile(&latex_content).await?;

    if result.succeeded {
        return Ok((
            StatusCode::OK,
            Json(ConvertLatexResponse {
                tex_content: result.source_encoded,
                pdf_content: result.artifact_encoded,
                error: None,
            }),
        ));
    }

    let diagnostic = result.diagnostic.unwrap_or_default();
    let errors = summarize_errors(&diagnostic);
    Ok((
        StatusCode::PARTIAL_CONTENT,
        Json(ConvertLatexResponse {
            tex_content: result.source_encoded,
            pdf_content: None,
            error: Some(CompileFailure {
                code: "PDF_GENERATION_FAILED",
                message: "PDF generation failed",
                diagnostic,
                errors,
            }),
        }),
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::latex::compiler::ARTIFACT_NOT_PRODUCED;
    use crate::routes::build_router;
    use crate::state::AppState;
    use crate::test_support::{
        test_state, test_state_with_timeout, FakeToolchain, ScriptedGenerator, ToolchainBehavior,
    };

    const MINIMAL: &str = "\\documentclass{article}\n\\begin{document}\nHi\n\\end{document}\n";

    async fn post_latex(fake: &FakeToolchain, body: Body) -> (StatusCode, Value) {
        let state = test_state(Arc::new(ScriptedGenerator::failing()), fake).await;
        post_latex_to(state, body).await
    }

    async fn post_latex_to(state: AppState, body: Body) -> (StatusCode, Value) {
        let response = build_router(state)
            .oneshot(
                Request::post("/convert/latex")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_valid_document_returns_both_blobs() {
        let fake = FakeToolchain::new(ToolchainBehavior::Pdflatex);
        let latex = "\\documentclass{article}\n\\begin{document}\nHi\n\\end{document}\n";

        let (status, body) =
            post_latex(&fake, Body::from(json!({ "latex_content": latex }).to_string())).await;

        assert_eq!(status, StatusCode::OK);
        let tex = STANDARD.decode(body["tex_content"].as_str().unwrap()).unwrap();
        assert_eq!(tex, latex.as_bytes());
        assert!(body["pdf_content"].as_str().is_some());
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_rejected_document_returns_206_with_source() {
        let fake = FakeToolchain::new(ToolchainBehavior::Pdflatex);
        let latex = "\\documentclass{article}\n\\begin{document}\n\\undefinedcommand\n\\end{document}\n";

        let (status, body) =
            post_latex(&fake, Body::from(json!({ "latex_content": latex }).to_string())).await;

        assert_eq!(status, StatusCode::PARTIAL_CONTENT);
        assert!(body["tex_content"].as_str().is_some());
        assert!(body["pdf_content"].is_null());
        assert_eq!(body["error"]["code"], "PDF_GENERATION_FAILED");
        assert_eq!(
            body["error"]["errors"][0],
            "Undefined control sequence. (l.3 \\undefinedcommand)"
        );
    }

    #[tokio::test]
    async fn test_empty_content_is_400_without_toolchain_call() {
        let fake = FakeToolchain::new(ToolchainBehavior::Pdflatex);

        let (status, body) =
            post_latex(&fake, Body::from(json!({ "latex_content": "" }).to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(fake.compile_invocations().is_empty());
    }

    #[tokio::test]
    async fn test_missing_field_is_400() {
        let fake = FakeToolchain::new(ToolchainBehavior::Pdflatex);

        let (status, body) = post_latex(&fake, Body::from("{}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "No LaTeX content provided");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let fake = FakeToolchain::new(ToolchainBehavior::Pdflatex);

        let (status, _) = post_latex(&fake, Body::from("not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_markers_are_400() {
        let fake = FakeToolchain::new(ToolchainBehavior::Pdflatex);

        let (status, body) = post_latex(
            &fake,
            Body::from(json!({ "latex_content": "Jane Doe, Rust engineer" }).to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid LaTeX structure"));
        assert!(fake.compile_invocations().is_empty());
    }

    #[tokio::test]
    async fn test_silent_toolchain_returns_206_with_generic_diagnostic() {
        let fake = FakeToolchain::new(ToolchainBehavior::SilentNoOutput);

        let (status, body) =
            post_latex(&fake, Body::from(json!({ "latex_content": MINIMAL }).to_string())).await;

        assert_eq!(status, StatusCode::PARTIAL_CONTENT);
        let tex = STANDARD.decode(body["tex_content"].as_str().unwrap()).unwrap();
        assert_eq!(tex, MINIMAL.as_bytes());
        assert!(body["pdf_content"].is_null());
        assert_eq!(body["error"]["diagnostic"], ARTIFACT_NOT_PRODUCED);
        assert_eq!(body["error"]["errors"], json!([]));
    }

    #[tokio::test]
    async fn test_hung_toolchain_is_500_without_cause() {
        let fake = FakeToolchain::new(ToolchainBehavior::Hang);
        let state = test_state_with_timeout(
            Arc::new(ScriptedGenerator::failing()),
            &fake,
            Duration::from_millis(500),
        )
        .await;

        let (status, body) =
            post_latex_to(state, Body::from(json!({ "latex_content": MINIMAL }).to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "COMPILATION_ERROR");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(!message.contains("timed out"), "cause leaked: {message}");
        assert!(!message.contains("pass"), "cause leaked: {message}");
        assert!(body.get("tex_content").is_none());
    }
}
