//! Error types for the HTTP backends.

use thiserror::Error;

/// Errors raised while setting up or probing a remote service.
///
/// Request failures during extraction and saving are reported through
/// `ProviderFailure` and `StoreResponse` instead.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The HTTP client could not be built or the request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    /// A required credential is missing from the environment and config.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
