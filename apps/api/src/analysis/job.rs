//! Job description analysis — two independent extractions against the same JD.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::prompts::{BENEFITS_PROMPT_TEMPLATE, EXTRACTION_PARAMS, KEYWORDS_PROMPT_TEMPLATE};
use crate::errors::AppError;
use crate::llm_client::{fill_template, TextGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    /// Comma-separated keywords exactly as generated.
    pub keywords: String,
    /// Comma-separated benefits, compensation first when listed.
    pub benefits: String,
    /// `keywords` split into individual, de-duplicated entries.
    pub keyword_list: Vec<String>,
}

/// Extracts keywords and benefits from a job description.
pub async fn analyze_job_description(
    job_description: &str,
    llm: &dyn TextGenerator,
) -> Result<JobAnalysis, AppError> {
    let values = [("job_description", job_description)];
    let keywords_prompt = fill_template(KEYWORDS_PROMPT_TEMPLATE, &values);
    let benefits_prompt = fill_template(BENEFITS_PROMPT_TEMPLATE, &values);

    debug!("Requesting keyword and benefit extraction");
    let (keywords, benefits) = tokio::try_join!(
        llm.generate(&keywords_prompt, EXTRACTION_PARAMS),
        llm.generate(&benefits_prompt, EXTRACTION_PARAMS),
    )?;

    let keywords = keywords.trim().to_string();
    let benefits = benefits.trim().to_string();
    let keyword_list = split_keywords(&keywords);
    debug!(keywords = keyword_list.len(), "Job description analyzed");

    Ok(JobAnalysis {
        keywords,
        benefits,
        keyword_list,
    })
}

/// Splits a comma-separated list, dropping blanks and case-insensitive repeats.
/// The first spelling of a repeated keyword wins.
pub fn split_keywords(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.split(',')
        .map(|k| k.trim().trim_end_matches('.').trim())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.to_lowercase()))
        .map(String::from)
        .collect()
}
