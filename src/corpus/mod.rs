//! Verse corpus: the immutable, ordered text being recited.
//!
//! A [`Corpus`] is built once per process (usually from the JSON file named by
//! [`CorpusConfig`](crate::config::CorpusConfig)) and then shared read-only,
//! typically behind an `Arc`, with the search and tracking stages.
//!
//! # Quick start
//!
//! ```rust
//! use recitation_tracker::corpus::{Corpus, Verse};
//!
//! let corpus = Corpus::from_verses(vec![
//!     Verse::new(1, 1, "بسم الله الرحمن الرحيم"),
//!     Verse::new(1, 2, "الحمد لله رب العالمين"),
//!     Verse::new(2, 1, "الم"),
//! ])
//! .unwrap();
//!
//! assert_eq!(corpus.chapter_count(), 2);
//! assert_eq!(corpus.verse_count(1).unwrap(), 2);
//! assert_eq!(corpus.verse_at(2, 1).unwrap().text, "الم");
//! ```

pub mod loader;
pub mod verse;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use loader::{parse_corpus_json, ChapterRecord, ChapterVerseRecord, VerseRecord};
pub use verse::{Corpus, CorpusError, Verse};
