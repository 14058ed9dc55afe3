//! Field extraction from payment notes: rules, LLM, and the fallback between them.

mod llm;
mod prompt;
mod rule_based;
pub mod rules;

pub use llm::{
    parse_payload, post_process, ChatBackend, ChatMessage, ChatRequest, LlmExtractor, NoBackend,
    ResponseFormat,
};
pub use prompt::{build_prompt, SYSTEM_PROMPT};
pub use rule_based::RuleBasedExtractor;

use crate::error::ProviderFailure;
use crate::models::fields::ExtractedFields;

/// Where a set of fields came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionSource {
    /// The hosted model produced the fields.
    Llm,
    /// The rule-based extractor produced the fields, because of `reason`.
    Rules { reason: ProviderFailure },
}

impl ExtractionSource {
    /// Short label for logs and output.
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionSource::Llm => "llm",
            ExtractionSource::Rules { .. } => "rules",
        }
    }
}

/// Extracted fields together with their source.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub fields: ExtractedFields,
    pub source: ExtractionSource,
}
