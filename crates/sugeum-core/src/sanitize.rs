//! Input cleanup applied before any extraction.

/// Default maximum input length in characters.
pub const MAX_INPUT_CHARS: usize = 1000;

const SCRIPT_MARKERS: &[&str] = &["<script>", "</script>", "javascript:", "onclick=", "onerror="];

const SQL_KEYWORDS: &[&str] = &["DROP", "DELETE", "INSERT", "UPDATE", "EXEC", "--"];

/// Trim, truncate to `max_chars` characters, and strip script markers and
/// SQL keywords.
pub fn sanitize_input(text: &str, max_chars: usize) -> String {
    let mut cleaned: String = text.trim().chars().take(max_chars).collect();

    for marker in SCRIPT_MARKERS.iter().chain(SQL_KEYWORDS) {
        cleaned = cleaned.replace(marker, "");
    }

    cleaned.trim().to_string()
}
