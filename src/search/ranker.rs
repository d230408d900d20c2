//! Candidate ranking: score every verse window and keep the best few.

use crate::corpus::Corpus;
use crate::matcher::phrase_match_score;

/// Default number of candidates returned by [`search`].
pub const DEFAULT_TOP_K: usize = 10;

/// Joins a verse with its successor when building a match window.
pub const WINDOW_SEPARATOR: &str = " ";

// ---------------------------------------------------------------------------
// ScoredCandidate
// ---------------------------------------------------------------------------

/// A verse together with its lexical score for one query.
///
/// Derived per query and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub chapter: u32,
    pub verse: u32,
    /// The verse's own text (not the two-verse window it was scored on).
    pub text: String,
    pub score: f64,
}

impl ScoredCandidate {
    pub fn new(chapter: u32, verse: u32, text: impl Into<String>, score: f64) -> Self {
        Self {
            chapter,
            verse,
            text: text.into(),
            score,
        }
    }
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// Text of verse `index` followed by the next verse in corpus order.
///
/// The last verse gets an empty successor, so its window ends with the
/// separator.  Recitation often runs across a verse boundary within one
/// segment, which the two-verse window captures.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
pub fn match_window(corpus: &Corpus, index: usize) -> String {
    let verses = corpus.verses();
    let next = verses.get(index + 1).map(|v| v.text.as_str()).unwrap_or("");
    format!("{}{}{}", verses[index].text, WINDOW_SEPARATOR, next)
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

/// Rank verses of `corpus` against `query`.
///
/// * `restrict_chapter`: only score verses of this chapter.  Windows still
///   borrow the following verse in corpus order, even across the chapter end.
/// * `top_k`: maximum number of results.
///
/// Results have `score > 0`, are sorted by descending score and keep corpus
/// order among equal scores.  An empty corpus, a blank query or an unknown
/// `restrict_chapter` yields an empty list.
pub fn search(
    corpus: &Corpus,
    query: &str,
    restrict_chapter: Option<u32>,
    top_k: usize,
) -> Vec<ScoredCandidate> {
    if corpus.is_empty() || query.trim().is_empty() || top_k == 0 {
        return Vec::new();
    }

    let range = match restrict_chapter {
        None => 0..corpus.len(),
        Some(chapter) => match corpus.chapter_range(chapter) {
            Ok(range) => range,
            Err(e) => {
                log::warn!("search: {e}; returning no candidates");
                return Vec::new();
            }
        },
    };

    let mut scored: Vec<(usize, f64)> = range
        .map(|i| (i, phrase_match_score(query, &match_window(corpus, i))))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    // `sort_by` is stable: equal scores stay in corpus order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_k);

    log::debug!(
        "search: {} candidates for {:?} (chapter filter {:?})",
        scored.len(),
        query,
        restrict_chapter
    );

    let verses = corpus.verses();
    scored
        .into_iter()
        .map(|(i, score)| {
            let v = &verses[i];
            ScoredCandidate::new(v.chapter, v.verse, v.text.clone(), score)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
