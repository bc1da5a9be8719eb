// All LLM prompt constants for the Analysis module.

use crate::llm_client::prompts::CAREER_ADVISOR_SYSTEM;
use crate::llm_client::GenerationParams;

/// Short, list-shaped answers; low temperature keeps extraction stable.
pub const EXTRACTION_PARAMS: GenerationParams = GenerationParams {
    system: CAREER_ADVISOR_SYSTEM,
    max_tokens: 300,
    temperature: 0.3,
};

/// Keyword extraction prompt. Replace `{job_description}` before sending.
pub const KEYWORDS_PROMPT_TEMPLATE: &str = "Extract the most important technical skills, \
interpersonal skills, and qualifications from the following job description. \
Return the results as a comma-separated list of only these keywords. Do not include categories.

Job Description:
{job_description}
";

/// Benefit extraction prompt. Replace `{job_description}` before sending.
pub const BENEFITS_PROMPT_TEMPLATE: &str = "Extract all the benefits listed in the following job description. \
If a compensation range is listed, return that first. Return all the results as a comma-separated list.

Job Description:
{job_description}
";
