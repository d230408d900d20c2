//! Candidate search over the verse corpus.
//!
//! ```text
//! query ──▶ for each verse i (optionally one chapter only)
//!             window = verse[i] + " " + verse[i + 1]
//!             score  = phrase_match_score(query, window)
//!       ──▶ drop score ≤ 0 ──▶ stable sort desc ──▶ take top_k
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use recitation_tracker::corpus::{Corpus, Verse};
//! use recitation_tracker::search::{search, DEFAULT_TOP_K};
//!
//! let corpus = Corpus::from_verses(vec![
//!     Verse::new(1, 1, "بسم الله الرحمن الرحيم"),
//!     Verse::new(1, 2, "الحمد لله رب العالمين"),
//! ])
//! .unwrap();
//!
//! let results = search(&corpus, "الحمد لله", None, DEFAULT_TOP_K);
//! // The shorter window around 1:2 is the denser match.
//! assert_eq!((results[0].chapter, results[0].verse), (1, 2));
//! ```

pub mod ranker;

pub use ranker::{match_window, search, ScoredCandidate, DEFAULT_TOP_K, WINDOW_SEPARATOR};
