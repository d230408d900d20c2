//! Transcript text helpers used before a segment reaches the search stage.
//!
//! The matcher works on already-normalised strings; these helpers are how
//! the session driver gets them into that shape.

pub mod arabic;

pub use arabic::{is_arabic_mark, normalize_arabic};

/// Number of whitespace-separated tokens in `text`.
///
/// ```
/// use recitation_tracker::text::token_count;
///
/// assert_eq!(token_count("  الحمد   لله "), 2);
/// assert_eq!(token_count(""), 0);
/// ```
pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `true` when `text` has at least `min_tokens` tokens and is worth scoring.
pub fn meets_token_minimum(text: &str, min_tokens: usize) -> bool {
    token_count(text) >= min_tokens
}
