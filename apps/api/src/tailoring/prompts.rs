// All LLM prompt constants for the Tailoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::RESUME_WRITER_SYSTEM;
use crate::llm_client::GenerationParams;

pub const SUGGEST_PARAMS: GenerationParams = GenerationParams {
    system: RESUME_WRITER_SYSTEM,
    max_tokens: 1000,
    temperature: 0.3,
};

/// Full-document rewrite: large budget, near-deterministic output.
pub const APPLY_PARAMS: GenerationParams = GenerationParams {
    system: RESUME_WRITER_SYSTEM,
    max_tokens: 4000,
    temperature: 0.1,
};

/// Suggestion prompt template.
/// Replace: {job_description}, {resume_text}
pub const SUGGEST_PROMPT_TEMPLATE: &str = r#"You have been given a resume (possibly in LaTeX) and a job description. Analyze the resume and identify how it can be improved and tailored to better match the job description. Do not rewrite the entire resume here, just list suggestions. Focus on skills, keywords, relevant experience, and how to emphasize the candidate's fit.

Assume that the candidate has a strong background in many technologies that aren't necessarily mentioned in the original resume.

Job Description:
{job_description}

Resume:
{resume_text}

List out suggestions in bullet points."#;

/// Rewrite prompt template.
/// Replace: {suggestions}, {resume_text}, {latex_only_instruction}
pub const APPLY_PROMPT_TEMPLATE: &str = r#"You have a resume and a set of improvement suggestions. Incorporate these suggestions into the resume and add LaTeX formatting and structure. If the resume already contains LaTeX formatting commands, do not remove them; only update text where it makes sense. Make sure to incorporate relevant keywords and highlight experiences and skills that match the job description.

Suggestions:
{suggestions}

Original Resume:
{resume_text}

Return the full updated resume in LaTeX.
{latex_only_instruction}"#;
