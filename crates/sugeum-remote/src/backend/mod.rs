//! Backend implementations.

#[cfg(feature = "notion")]
pub mod notion;

#[cfg(feature = "openai")]
pub mod openai;

/// Cap on error bodies kept in failures and logs.
const MAX_BODY_CHARS: usize = 500;

#[cfg(any(feature = "openai", feature = "notion"))]
fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_CHARS {
        body.to_string()
    } else {
        let mut truncated: String = body.chars().take(MAX_BODY_CHARS).collect();
        truncated.push('…');
        truncated
    }
}
