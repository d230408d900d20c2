//! [`Verse`] and [`Corpus`] types plus the corpus error taxonomy.

use std::path::Path;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CorpusError
// ---------------------------------------------------------------------------

/// Errors raised while loading or addressing the corpus.
///
/// `Io`, `Parse`, `Empty` and `Incomplete` are load failures and are fatal at
/// startup.  `UnknownChapter` and `NotFound` indicate a caller passed an
/// address the corpus never produced.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The backing file could not be read.
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing data is not a recognised verse layout.
    #[error("malformed corpus data: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backing data parsed but contained no verses.
    #[error("corpus contains no verses")]
    Empty,

    /// Verses are missing, duplicated or out of order.
    #[error("incomplete corpus: {0}")]
    Incomplete(String),

    /// Chapter outside `[1, chapter_count]`.
    #[error("unknown chapter {chapter} (corpus has {chapters} chapters)")]
    UnknownChapter { chapter: u32, chapters: u32 },

    /// Verse address outside the corpus.
    #[error("verse {chapter}:{verse} not found")]
    NotFound { chapter: u32, verse: u32 },
}

// ---------------------------------------------------------------------------
// Verse
// ---------------------------------------------------------------------------

/// Smallest addressable unit of the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    /// 1-based chapter number.
    pub chapter: u32,
    /// 1-based verse number within the chapter.
    pub verse: u32,
    /// Diacritic-free verse text.
    pub text: String,
}

impl Verse {
    pub fn new(chapter: u32, verse: u32, text: impl Into<String>) -> Self {
        Self {
            chapter,
            verse,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Corpus
// ---------------------------------------------------------------------------

/// Ordered, read-only verse collection grouped by chapter.
///
/// There is no mutation API: once constructed the corpus can be shared
/// freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    verses: Vec<Verse>,
    /// `chapter_starts[c - 1]` is the index of verse `c:1` in `verses`.
    chapter_starts: Vec<usize>,
}

impl Corpus {
    /// A corpus with no verses.  Searching it always yields nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a corpus from verses already in reading order.
    ///
    /// # Errors
    ///
    /// [`CorpusError::Incomplete`] unless chapters run contiguously from 1
    /// and each chapter's verses run contiguously from 1 with non-empty text.
    pub fn from_verses(verses: Vec<Verse>) -> Result<Self, CorpusError> {
        let mut chapter_starts = Vec::new();
        let mut prev: Option<(u32, u32)> = None;

        for (idx, v) in verses.iter().enumerate() {
            if v.text.trim().is_empty() {
                return Err(CorpusError::Incomplete(format!(
                    "verse {}:{} has no text",
                    v.chapter, v.verse
                )));
            }

            let expected = match prev {
                None => (1, 1),
                Some((c, n)) if v.chapter == c => (c, n + 1),
                Some((c, _)) => (c + 1, 1),
            };
            if (v.chapter, v.verse) != expected {
                return Err(CorpusError::Incomplete(format!(
                    "expected verse {}:{} at position {}, found {}:{}",
                    expected.0, expected.1, idx, v.chapter, v.verse
                )));
            }

            if v.verse == 1 {
                chapter_starts.push(idx);
            }
            prev = Some((v.chapter, v.verse));
        }

        log::debug!(
            "corpus: {} verses across {} chapters",
            verses.len(),
            chapter_starts.len()
        );

        Ok(Self {
            verses,
            chapter_starts,
        })
    }

    /// Load and validate a JSON corpus file.
    ///
    /// Both the flat verse list and the chaptered layout are accepted; see
    /// [`parse_corpus_json`](crate::corpus::parse_corpus_json).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let corpus = Self::from_json_str(&data)?;
        log::info!(
            "corpus loaded from {} ({} verses)",
            path.display(),
            corpus.len()
        );
        Ok(corpus)
    }

    /// Parse and validate corpus JSON held in memory.
    pub fn from_json_str(data: &str) -> Result<Self, CorpusError> {
        let verses = super::loader::parse_corpus_json(data)?;
        if verses.is_empty() {
            return Err(CorpusError::Empty);
        }
        Self::from_verses(verses)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All verses in reading order.
    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    /// Total number of verses.
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Number of chapters `N`; valid chapters are `1..=N`.
    pub fn chapter_count(&self) -> u32 {
        self.chapter_starts.len() as u32
    }

    /// Number of verses in `chapter`.
    pub fn verse_count(&self, chapter: u32) -> Result<u32, CorpusError> {
        let range = self.chapter_range(chapter)?;
        Ok(range.len() as u32)
    }

    /// The verse at `chapter:verse`.
    pub fn verse_at(&self, chapter: u32, verse: u32) -> Result<&Verse, CorpusError> {
        let idx = self.index_of(chapter, verse)?;
        Ok(&self.verses[idx])
    }

    /// Position of `chapter:verse` in [`verses`](Self::verses).
    pub fn index_of(&self, chapter: u32, verse: u32) -> Result<usize, CorpusError> {
        let range = self
            .chapter_range(chapter)
            .map_err(|_| CorpusError::NotFound { chapter, verse })?;
        if verse == 0 || verse as usize > range.len() {
            return Err(CorpusError::NotFound { chapter, verse });
        }
        Ok(range.start + verse as usize - 1)
    }

    /// The verses of a single chapter.
    pub fn chapter_verses(&self, chapter: u32) -> Result<&[Verse], CorpusError> {
        let range = self.chapter_range(chapter)?;
        Ok(&self.verses[range])
    }

    /// Index range of `chapter` within [`verses`](Self::verses).
    pub fn chapter_range(&self, chapter: u32) -> Result<std::ops::Range<usize>, CorpusError> {
        let chapters = self.chapter_count();
        if chapter == 0 || chapter > chapters {
            return Err(CorpusError::UnknownChapter { chapter, chapters });
        }
        let start = self.chapter_starts[chapter as usize - 1];
        let end = self
            .chapter_starts
            .get(chapter as usize)
            .copied()
            .unwrap_or(self.verses.len());
        Ok(start..end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
