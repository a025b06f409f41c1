//! Argument mining: turn raw public comments into structured
//! [`edict_core::Argument`] records.
//!
//! Two extraction paths share one output shape. The keyword heuristic in
//! [`extractor`] is deterministic and offline; the [`extractor::LlmExtractor`]
//! calls any OpenAI-compatible endpoint and degrades to the heuristic per
//! comment on failure.

pub mod extractor;
pub mod llm;
pub mod prompt;

pub use extractor::{extract_argument, extract_arguments, LlmExtractor};
pub use llm::{ChatMessage, LlmClient, Role};
pub use prompt::{build_extraction_prompt, parse_extraction_response, ExtractedArgument};
