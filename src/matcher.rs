//! Lexical phrase matcher.
//!
//! [`phrase_match_score`] rates how well a transcribed fragment matches a
//! window of corpus text.  Both inputs must already be normalised.
//!
//! # Scoring
//!
//! ```text
//! window contains query verbatim  → 1 + |query| / |window|          (> 1)
//! otherwise, per query token      → first window token where either
//!                                   contains the other
//!   score = 0.7 · matched / total
//!         + 0.2 · (matches landing right after the previous match)
//!         + 0.1 · min(1, |query| / |window|)
//! no token matched                → 0
//! ```
//!
//! Lengths are counted in `char`s.  The consecutive bonus is uncapped, so a
//! long contiguous run can out-score a verbatim hit on a shorter window.

/// Weight of the matched-token ratio.
pub const TOKEN_COVERAGE_WEIGHT: f64 = 0.7;
/// Added for each match at the index right after the previous match.
pub const CONSECUTIVE_BONUS: f64 = 0.2;
/// Weight of the query/window length ratio.
pub const LENGTH_RATIO_WEIGHT: f64 = 0.1;

/// Score `query` against `window`.  Returns `0.0` for no match.
///
/// ```
/// use recitation_tracker::matcher::phrase_match_score;
///
/// assert!(phrase_match_score("الحمد لله", "الحمد لله رب العالمين") > 1.0);
/// assert_eq!(phrase_match_score("xyz abc", "الحمد لله"), 0.0);
/// ```
pub fn phrase_match_score(query: &str, window: &str) -> f64 {
    if query.trim().is_empty() {
        return 0.0;
    }

    let query_len = query.chars().count() as f64;
    let window_len = window.chars().count() as f64;

    if window.contains(query) {
        return 1.0 + query_len / window_len;
    }

    let window_tokens: Vec<&str> = window.split_whitespace().collect();
    let mut total = 0usize;
    let mut matched = 0usize;
    let mut consecutive_bonus = 0.0;
    let mut last_match: Option<usize> = None;

    for q in query.split_whitespace() {
        total += 1;
        let hit = window_tokens
            .iter()
            .position(|t| t.contains(q) || q.contains(t));
        if let Some(idx) = hit {
            matched += 1;
            if last_match.is_some_and(|last| idx == last + 1) {
                consecutive_bonus += CONSECUTIVE_BONUS;
            }
            last_match = Some(idx);
        }
    }

    if matched == 0 {
        return 0.0;
    }

    let coverage = matched as f64 / total as f64;
    let length_ratio = (query_len / window_len).min(1.0);

    TOKEN_COVERAGE_WEIGHT * coverage + consecutive_bonus + LENGTH_RATIO_WEIGHT * length_ratio
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
