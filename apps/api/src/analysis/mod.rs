// Job description analysis: keyword and benefit extraction.
// All LLM calls go through the TextGenerator seam — no direct API calls here.

pub mod handlers;
pub mod job;
pub mod prompts;
