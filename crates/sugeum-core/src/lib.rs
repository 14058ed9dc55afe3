//! Core library for construction-site payment notes.
//!
//! This crate provides:
//! - Korean date and amount normalization
//! - Rule-based and LLM-backed field extraction with automatic fallback
//! - Mapping onto the six-field ledger record (who/what/when/where/why/how)
//! - The record store contract, daily usage limits, and the save lifecycle

pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod sanitize;
pub mod store;
pub mod submission;
pub mod usage;

pub use error::{
    PersistenceFailure, ProviderFailure, Result, StoreError, SubmissionError, SugeumError,
};
pub use extract::rules::{
    format_won, normalize_amount, parse_korean_amount, resolve_korean_date, DateResolver,
};
pub use extract::{
    ChatBackend, ChatMessage, ChatRequest, Extraction, ExtractionSource, LlmExtractor, NoBackend,
    RuleBasedExtractor,
};
pub use models::config::{ExtractionConfig, ProviderConfig, StoreConfig, SugeumConfig};
pub use models::fields::{AmountField, ExtractedFields};
pub use models::record::CanonicalRecord;
pub use normalize::RecordNormalizer;
pub use sanitize::sanitize_input;
pub use store::{RecordStore, StoreResponse};
pub use submission::{Analysis, Assistant, Submission, SubmissionState};
pub use usage::{UsageKind, UsageLedger, UsageLimits};
