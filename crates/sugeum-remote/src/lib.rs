//! HTTP collaborators for sugeum.
//!
//! This crate provides:
//! - `openai`: a chat-completion backend for any OpenAI-compatible API
//!   (DeepSeek by default), with bounded jittered retries
//! - `notion`: a record store writing pages into a Notion database

mod backend;
mod error;

pub use error::RemoteError;

#[cfg(feature = "openai")]
pub use backend::openai::{OpenAiChatBackend, RetryPolicy};

#[cfg(feature = "notion")]
pub use backend::notion::{build_page_payload, interpret_response, NotionStore, MISSING_CREDENTIALS};

/// Result type for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;
