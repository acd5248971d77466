// Resume extraction: PDF text → local LLM → validated record.
// All model calls go through llm_client.

pub mod extractor;
pub mod handlers;
pub mod json_repair;
pub mod prompts;
