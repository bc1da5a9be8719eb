use std::sync::Arc;

use crate::config::Config;
use crate::latex::LatexCompiler;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable text generator. Production: `LlmClient`.
    pub llm: Arc<dyn TextGenerator>,
    /// Holds no per-compile state; every compile owns its own workspace.
    pub compiler: LatexCompiler,
    pub config: Config,
}
