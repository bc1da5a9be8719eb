pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extraction::handlers as extraction;
use crate::latex::handlers as conversion;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/version", get(health::version_handler))
        // Analysis API
        .route("/analyze/job", post(analysis::handle_analyze_job))
        // Resume API
        .route(
            "/resume/extract-text",
            post(extraction::handle_extract_text),
        )
        .route(
            "/resume/suggest-improvements",
            post(tailoring::handle_suggest_improvements),
        )
        .route(
            "/resume/apply-improvements",
            post(tailoring::handle_apply_improvements),
        )
        // Conversion API
        .route("/convert/latex", post(conversion::handle_convert_latex))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(all(test, unix))]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{test_state, FakeToolchain, ScriptedGenerator, ToolchainBehavior};

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let fake = FakeToolchain::new(ToolchainBehavior::Pdflatex);
        let state = test_state(Arc::new(ScriptedGenerator::failing()), &fake).await;
        let response = build_router(state)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_version_reports_alpha() {
        let (status, body) = get_json("/version").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "alpha");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = get_json("/api/v1/resumes").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
