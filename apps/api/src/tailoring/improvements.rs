//! Suggest-then-apply tailoring. The two steps are separate calls so the user
//! can review and edit suggestions before they are applied.

use tracing::{debug, warn};

use crate::errors::AppError;
use crate::latex::validation::validate_markup;
use crate::llm_client::prompts::LATEX_ONLY_INSTRUCTION;
use crate::llm_client::{fill_template, strip_code_fences, TextGenerator};
use crate::tailoring::prompts::{
    APPLY_PARAMS, APPLY_PROMPT_TEMPLATE, SUGGEST_PARAMS, SUGGEST_PROMPT_TEMPLATE,
};

/// Lists bullet-point suggestions for tailoring `resume_text` to `job_description`.
pub async fn suggest_improvements(
    resume_text: &str,
    job_description: &str,
    llm: &dyn TextGenerator,
) -> Result<String, AppError> {
    let prompt = fill_template(
        SUGGEST_PROMPT_TEMPLATE,
        &[("job_description", job_description), ("resume_text", resume_text)],
    );

    debug!("Requesting resume improvement suggestions");
    let suggestions = llm.generate(&prompt, SUGGEST_PARAMS).await?;
    Ok(suggestions.trim().to_string())
}

/// Rewrites the resume as a LaTeX document with `suggestions` applied.
///
/// The output is not compiled here; callers pass it to `/convert/latex`. A rewrite
/// that would fail the compiler's structural check is logged but still returned,
/// so the user can repair it by hand.
pub async fn apply_improvements(
    resume_text: &str,
    suggestions: &str,
    llm: &dyn TextGenerator,
) -> Result<String, AppError> {
    let prompt = fill_template(
        APPLY_PROMPT_TEMPLATE,
        &[
            ("suggestions", suggestions),
            ("resume_text", resume_text),
            ("latex_only_instruction", LATEX_ONLY_INSTRUCTION),
        ],
    );

    debug!("Requesting tailored LaTeX resume");
    let generated = llm.generate(&prompt, APPLY_PARAMS).await?;
    let latex = strip_code_fences(&generated).to_string();

    if let Err(e) = validate_markup(&latex) {
        warn!(error = %e, "Generated resume is not a complete LaTeX document");
    }

    Ok(latex)
}
