// Resume tailoring: improvement suggestions and LaTeX rewrites against a job description.
// All LLM calls go through the TextGenerator seam — no direct API calls here.

pub mod handlers;
pub mod improvements;
pub mod prompts;
