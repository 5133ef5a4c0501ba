//! Shared utility functions.

/// Shorten `s` to at most `max_chars` characters for log output, marking
/// the cut with `...`.
pub fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((end, _)) => format!("{}...", &s[..end]),
    }
}
