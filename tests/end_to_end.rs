//! End-to-end tracking over a small corpus loaded from disk.

use std::io::Write;
use std::sync::Arc;

use recitation_tracker::config::AppConfig;
use recitation_tracker::corpus::Corpus;
use recitation_tracker::search::{search, DEFAULT_TOP_K};
use recitation_tracker::session::{new_shared_session, Segment, SessionDriver};
use recitation_tracker::tracker::{Position, PositionTracker, SWITCH_CONFIRMATIONS};

const CHAPTERED_JSON: &str = r#"[
  {"id": 1, "verses": [
    {"id": 1, "text": "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ"},
    {"id": 2, "text": "الحمد لله رب العالمين"},
    {"id": 3, "text": "الرحمن الرحيم"}
  ]},
  {"id": 2, "verses": [
    {"id": 1, "text": "الم"},
    {"id": 2, "text": "ذلك الكتاب لا ريب فيه هدى للمتقين"}
  ]}
]"#;

const FLAT_JSON: &str = r#"[
  {"surah": 1, "ayah": 1, "text": "بسم الله الرحمن الرحيم"},
  {"surah": 1, "ayah": 2, "text": "الحمد لله رب العالمين"},
  {"surah": 1, "ayah": 3, "text": "الرحمن الرحيم"},
  {"surah": 2, "ayah": 1, "text": "الم"},
  {"surah": 2, "ayah": 2, "text": "ذلك الكتاب لا ريب فيه هدى للمتقين"}
]"#;

fn load(json: &str) -> Arc<Corpus> {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    Arc::new(Corpus::load(file.path()).expect("corpus loads"))
}

fn driver(corpus: Arc<Corpus>) -> SessionDriver {
    SessionDriver::new(new_shared_session(), corpus, &AppConfig::default())
}

#[test]
fn both_file_layouts_load_the_same_addresses() {
    let flat = load(FLAT_JSON);
    let chaptered = load(CHAPTERED_JSON);

    assert_eq!(flat.len(), 5);
    assert_eq!(chaptered.len(), 5);
    assert_eq!(flat.chapter_count(), 2);
    assert_eq!(chaptered.verse_count(1).unwrap(), 3);
    for (a, b) in flat.verses().iter().zip(chaptered.verses()) {
        assert_eq!((a.chapter, a.verse), (b.chapter, b.verse));
    }
}

#[test]
fn search_finds_phrase_shared_by_several_verses() {
    let corpus = load(FLAT_JSON);
    let results = search(&corpus, "الرحمن الرحيم", None, DEFAULT_TOP_K);

    assert!(!results.is_empty());
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(results.iter().all(|r| r.score > 0.0));
    assert!(results.iter().any(|r| (r.chapter, r.verse) == (1, 3)));
}

#[test]
fn recitation_is_followed_verse_by_verse() {
    let mut driver = driver(load(FLAT_JSON));

    let first = driver.process_text("بسم الله الرحمن").unwrap().unwrap();
    assert_eq!(first.position, Position::new(1, 1));
    assert_eq!(first.position.to_string(), "001:001");

    let second = driver.process_text("الحمد لله رب العالمين").unwrap().unwrap();
    assert_eq!(second.position, Position::new(1, 2));
    assert_eq!(second.verse_text, "الحمد لله رب العالمين");
}

#[test]
fn previous_verse_does_not_pull_position_back() {
    let mut driver = driver(load(FLAT_JSON));
    driver.process_text("بسم الله الرحمن").unwrap();
    driver.process_text("الحمد لله رب العالمين").unwrap();

    assert_eq!(driver.process_text("بسم الله الرحمن").unwrap(), None);
    assert_eq!(driver.tracker().position(), Some(Position::new(1, 2)));
}

#[test]
fn chapter_switch_needs_repeated_evidence() {
    let mut driver = driver(load(FLAT_JSON));
    driver.process_text("بسم الله الرحمن").unwrap();

    for _ in 1..SWITCH_CONFIRMATIONS {
        assert_eq!(driver.process_text("ذلك الكتاب لا ريب").unwrap(), None);
        assert_eq!(driver.tracker().position(), Some(Position::new(1, 1)));
    }

    let update = driver
        .process_text("ذلك الكتاب لا ريب")
        .unwrap()
        .expect("switch accepted");
    assert_eq!(update.position, Position::new(2, 2));
    assert_eq!(driver.tracker().tracked().switch_count(2), 0);
}

#[test]
fn tracker_alone_starts_from_search_results() {
    let corpus = load(CHAPTERED_JSON);
    let mut tracker = PositionTracker::new(Arc::clone(&corpus));
    let candidates = search(&corpus, "ذلك الكتاب لا ريب", None, DEFAULT_TOP_K);

    assert_eq!(tracker.advance(&candidates).unwrap(), Some(Position::new(2, 2)));
    assert_eq!(tracker.current_chapter(), Some(2));
}

#[tokio::test]
async fn live_session_reports_updates_over_channel() {
    let driver = driver(load(FLAT_JSON));
    let sender = driver.sender();
    let (tx, mut rx) = tokio::sync::mpsc::channel(4);

    sender.submit(Segment::Text("بسم الله الرحمن".into()));
    sender.close();
    driver.run(tx).await.unwrap();

    let update = rx.recv().await.expect("one update");
    assert_eq!(update.position, Position::new(1, 1));
    assert!(rx.recv().await.is_none());
}
