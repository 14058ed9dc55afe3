//! Error types for the sugeum-core library.

use thiserror::Error;

use crate::usage::UsageKind;

/// Main error type for the sugeum library.
#[derive(Error, Debug)]
pub enum SugeumError {
    /// Extraction provider failure that was not recovered locally.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderFailure),

    /// Submission lifecycle error.
    #[error("submission error: {0}")]
    Submission(#[from] SubmissionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures of the hosted extraction provider.
///
/// Every variant is recovered by falling back to the rule-based extractor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    /// No backend or no API key was configured.
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider answered with a non-success status (auth, quota, ...).
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response carried no message content.
    #[error("provider returned no content")]
    EmptyContent,

    /// The message content was not a JSON object.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl ProviderFailure {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderFailure::Transport(_) => true,
            ProviderFailure::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// A record store call that did not persist the record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record store {}: {message}", describe_status(.status))]
pub struct PersistenceFailure {
    /// HTTP status returned by the store, `None` on transport errors.
    pub status: Option<u16>,
    /// Store-provided error message.
    pub message: String,
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("returned {}", code),
        None => "unreachable".to_string(),
    }
}

/// Errors raised by a record store implementation before a status is known.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The request could not be delivered.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors in the submit/confirm lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Empty text is rejected before any extraction call.
    #[error("input text is empty")]
    EmptyInput,

    /// The daily quota for this kind of call is used up.
    #[error("daily {kind} limit reached ({limit} calls)")]
    QuotaExceeded { kind: UsageKind, limit: u32 },

    /// The submission was already persisted once.
    #[error("record was already saved")]
    AlreadySaved,

    /// The record store rejected or never received the record.
    #[error(transparent)]
    Persistence(#[from] PersistenceFailure),
}

/// Result type for the sugeum library.
pub type Result<T> = std::result::Result<T, SugeumError>;
