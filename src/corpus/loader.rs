//! JSON corpus layouts.
//!
//! Two layouts are accepted:
//!
//! | Layout    | Shape |
//! |-----------|-------|
//! | Flat      | `[{"surah": 1, "ayah": 1, "text": "…"}, …]` |
//! | Chaptered | `[{"id": 1, "verses": [{"id": 1, "text": "…"}, …]}, …]` |
//!
//! The chaptered layout is the upstream distribution format; the flat one is
//! what it is usually pre-flattened into.  Both produce the same verse list.

use serde::{Deserialize, Serialize};

use super::verse::Verse;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One entry of the flat layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseRecord {
    pub surah: u32,
    pub ayah: u32,
    pub text: String,
}

/// One verse inside a [`ChapterRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterVerseRecord {
    pub id: u32,
    pub text: String,
}

/// One chapter of the chaptered layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub id: u32,
    pub verses: Vec<ChapterVerseRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusDocument {
    Flat(Vec<VerseRecord>),
    Chaptered(Vec<ChapterRecord>),
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse either layout into verses in document order.
///
/// Only the shape is checked here; ordering and completeness are validated
/// by [`Corpus::from_verses`](super::Corpus::from_verses).
pub fn parse_corpus_json(data: &str) -> Result<Vec<Verse>, serde_json::Error> {
    let doc: CorpusDocument = serde_json::from_str(data)?;
    let verses = match doc {
        CorpusDocument::Flat(records) => records
            .into_iter()
            .map(|r| Verse::new(r.surah, r.ayah, r.text))
            .collect(),
        CorpusDocument::Chaptered(chapters) => chapters
            .into_iter()
            .flat_map(|c| {
                let chapter = c.id;
                c.verses
                    .into_iter()
                    .map(move |v| Verse::new(chapter, v.id, v.text))
            })
            .collect(),
    };
    Ok(verses)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_layout() {
        let verses = parse_corpus_json(
            r#"[{"surah":1,"ayah":1,"text":"بسم الله"},{"surah":1,"ayah":2,"text":"الحمد لله"}]"#,
        )
        .expect("parse");
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[1], Verse::new(1, 2, "الحمد لله"));
    }

    #[test]
    fn parses_chaptered_layout() {
        let verses = parse_corpus_json(
            r#"[
                {"id":1,"verses":[{"id":1,"text":"a"},{"id":2,"text":"b"}]},
                {"id":2,"verses":[{"id":1,"text":"c"}]}
            ]"#,
        )
        .expect("parse");
        assert_eq!(
            verses,
            vec![Verse::new(1, 1, "a"), Verse::new(1, 2, "b"), Verse::new(2, 1, "c")]
        );
    }

    #[test]
    fn ignores_extra_fields() {
        let verses = parse_corpus_json(
            r#"[{"surah":1,"ayah":1,"text":"a","translation":"x"}]"#,
        )
        .expect("parse");
        assert_eq!(verses[0].text, "a");
    }

    #[test]
    fn rejects_unknown_shape() {
        assert!(parse_corpus_json(r#"{"verses": []}"#).is_err());
        assert!(parse_corpus_json(r#"[{"surah":"one","ayah":1,"text":"a"}]"#).is_err());
    }
}
