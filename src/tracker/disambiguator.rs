//! [`PositionTracker`]: the stateful decision step run once per segment.

use std::sync::Arc;

use thiserror::Error;

use crate::corpus::Corpus;
use crate::search::ScoredCandidate;

use super::state::{Position, TrackedPosition, TrackerPhase};

// ---------------------------------------------------------------------------
// Tuning constants
// ---------------------------------------------------------------------------

/// Adjusted scores at or below this never move the tracked position.
pub const ACCEPT_THRESHOLD: f64 = 0.85;

/// Minimum adjusted score for the runner-up `current + 1` to win over the top.
pub const LOOK_AHEAD_THRESHOLD: f64 = 0.9;

/// Detections of another chapter needed before switching to it.
pub const SWITCH_CONFIRMATIONS: u32 = 5;

/// Divisor shared by the chapter and verse distance penalties.
pub const DISTANCE_NORMALIZER: f64 = 144.0;

/// Multiplier on chapter distance before normalisation.
pub const CHAPTER_DISTANCE_WEIGHT: f64 = 10.0;

/// Upper bound of the chapter distance penalty.
pub const MAX_CHAPTER_PENALTY: f64 = 0.5;

// ---------------------------------------------------------------------------
// TrackerError
// ---------------------------------------------------------------------------

/// Contract violations detected by [`PositionTracker::advance`].
///
/// Candidates produced by [`search`](crate::search::search) over the same
/// corpus never trigger these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    #[error("invalid candidate {chapter}:{verse}: {reason}")]
    InvariantViolation {
        chapter: u32,
        verse: u32,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Penalties
// ---------------------------------------------------------------------------

/// Penalty for a candidate `to` chapters away from `from`, capped at
/// [`MAX_CHAPTER_PENALTY`].
pub fn chapter_penalty(from: u32, to: u32) -> f64 {
    let distance = from.abs_diff(to) as f64;
    (CHAPTER_DISTANCE_WEIGHT * distance / DISTANCE_NORMALIZER).min(MAX_CHAPTER_PENALTY)
}

/// Penalty for a candidate verse measured from the verse after `current`,
/// normalised by the candidate chapter's verse count.
pub fn verse_penalty(current_verse: u32, candidate_verse: u32, verse_count: u32) -> f64 {
    let expected = current_verse + 1;
    let distance = expected.abs_diff(candidate_verse) as f64;
    distance / verse_count.max(1) as f64 / DISTANCE_NORMALIZER
}

// ---------------------------------------------------------------------------
// PositionTracker
// ---------------------------------------------------------------------------

/// Owns the tracked position for one recitation session.
///
/// Not internally synchronised: call [`advance`](Self::advance) from one
/// place at a time (see [`crate::session`]).
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use recitation_tracker::corpus::{Corpus, Verse};
/// use recitation_tracker::search::ScoredCandidate;
/// use recitation_tracker::tracker::{Position, PositionTracker};
///
/// let corpus = Arc::new(
///     Corpus::from_verses(vec![Verse::new(1, 1, "a"), Verse::new(1, 2, "b")]).unwrap(),
/// );
/// let mut tracker = PositionTracker::new(corpus);
///
/// let update = tracker
///     .advance(&[ScoredCandidate::new(1, 1, "a", 1.5)])
///     .unwrap();
/// assert_eq!(update, Some(Position::new(1, 1)));
/// ```
#[derive(Debug, Clone)]
pub struct PositionTracker {
    corpus: Arc<Corpus>,
    state: TrackedPosition,
}

impl PositionTracker {
    /// A tracker in the unset state.
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self {
            corpus,
            state: TrackedPosition::new(),
        }
    }

    /// Full tracked state, including switch counters.
    pub fn tracked(&self) -> &TrackedPosition {
        &self.state
    }

    pub fn position(&self) -> Option<Position> {
        self.state.position()
    }

    pub fn phase(&self) -> TrackerPhase {
        self.state.phase()
    }

    /// The chapter to restrict searches to, if any is tracked.
    pub fn current_chapter(&self) -> Option<u32> {
        self.state.position().map(|p| p.chapter)
    }

    /// Forget the position and all switch evidence.
    pub fn reset(&mut self) {
        self.state = TrackedPosition::new();
    }

    // -----------------------------------------------------------------------
    // Decision step
    // -----------------------------------------------------------------------

    /// Feed one segment's ranked candidates and decide the new position.
    ///
    /// Returns `Ok(Some(position))` when the position is (re)confirmed and
    /// `Ok(None)` when this segment leaves it unchanged.
    ///
    /// # Errors
    ///
    /// [`TrackerError::InvariantViolation`] if any candidate does not address
    /// a verse of the corpus or has a non-finite score.  State is untouched.
    pub fn advance(
        &mut self,
        candidates: &[ScoredCandidate],
    ) -> Result<Option<Position>, TrackerError> {
        let verse_counts = candidates
            .iter()
            .map(|c| self.validate(c))
            .collect::<Result<Vec<u32>, _>>()?;

        let Some(current) = self.state.position() else {
            return Ok(self.bootstrap(candidates));
        };

        let mut ranked: Vec<(&ScoredCandidate, f64)> = candidates
            .iter()
            .zip(verse_counts)
            .map(|(c, verse_count)| {
                let adjusted = c.score
                    - chapter_penalty(current.chapter, c.chapter)
                    - verse_penalty(current.verse, c.verse, verse_count);
                (c, adjusted)
            })
            .filter(|(_, adjusted)| *adjusted > ACCEPT_THRESHOLD)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let Some(&(top, top_score)) = ranked.first() else {
            log::debug!(
                "tracker: no candidate above {ACCEPT_THRESHOLD} (of {}), holding {current}",
                candidates.len()
            );
            return Ok(None);
        };

        if top.chapter != current.chapter {
            return Ok(self.consider_switch(current, top, top_score));
        }

        let mut chosen = top;
        if let Some(&(second, second_score)) = ranked.get(1) {
            if second_score >= LOOK_AHEAD_THRESHOLD
                && second.chapter == current.chapter
                && second.verse == current.verse + 1
            {
                log::debug!(
                    "tracker: preferring next verse {}:{} ({second_score:.3}) over {}:{} ({top_score:.3})",
                    second.chapter,
                    second.verse,
                    top.chapter,
                    top.verse
                );
                chosen = second;
            }
        }

        if chosen.chapter == current.chapter && chosen.verse + 1 == current.verse {
            log::debug!("tracker: ignoring step back from {current}");
            return Ok(None);
        }

        let next = Position::new(chosen.chapter, chosen.verse);
        if next != current {
            log::info!("tracker: {current} → {next}");
        }
        self.state.move_to(next);
        Ok(Some(next))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn bootstrap(&mut self, candidates: &[ScoredCandidate]) -> Option<Position> {
        let top = candidates.first()?;
        let start = Position::new(top.chapter, top.verse);
        log::info!("tracker: starting at {start} (score {:.3})", top.score);
        self.state.move_to(start);
        Some(start)
    }

    fn consider_switch(
        &mut self,
        current: Position,
        top: &ScoredCandidate,
        score: f64,
    ) -> Option<Position> {
        let count = self.state.record_switch_evidence(top.chapter);
        if count < SWITCH_CONFIRMATIONS {
            log::debug!(
                "tracker: chapter {} detected ({count}/{SWITCH_CONFIRMATIONS}, score {score:.3}), staying at {current}",
                top.chapter
            );
            return None;
        }

        self.state.clear_switch_evidence(top.chapter);
        let next = Position::new(top.chapter, top.verse);
        log::info!("tracker: switching chapter {current} → {next}");
        self.state.move_to(next);
        Some(next)
    }

    /// Check `c` addresses a corpus verse; returns its chapter's verse count.
    fn validate(&self, c: &ScoredCandidate) -> Result<u32, TrackerError> {
        let violation = |reason: String| TrackerError::InvariantViolation {
            chapter: c.chapter,
            verse: c.verse,
            reason,
        };

        let verse_count = self
            .corpus
            .verse_count(c.chapter)
            .map_err(|e| violation(e.to_string()))?;
        if c.verse == 0 || c.verse > verse_count {
            return Err(violation(format!(
                "chapter {} has verses 1..={verse_count}",
                c.chapter
            )));
        }
        if !c.score.is_finite() {
            return Err(violation(format!("score {} is not finite", c.score)));
        }
        Ok(verse_count)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Verse;

    /// Chapters 1 and 2 with 7 verses each, chapter 3 with 3.
    fn corpus() -> Arc<Corpus> {
        let mut verses = Vec::new();
        for (chapter, count) in [(1, 7), (2, 7), (3, 3)] {
            for verse in 1..=count {
                verses.push(Verse::new(chapter, verse, format!("c{chapter} v{verse}")));
            }
        }
        Arc::new(Corpus::from_verses(verses).expect("valid corpus"))
    }

    fn cand(chapter: u32, verse: u32, score: f64) -> ScoredCandidate {
        ScoredCandidate::new(chapter, verse, format!("c{chapter} v{verse}"), score)
    }

    /// Tracker already following `chapter:verse`.
    fn tracking(chapter: u32, verse: u32) -> PositionTracker {
        let mut t = PositionTracker::new(corpus());
        t.advance(&[cand(chapter, verse, 1.5)]).unwrap();
        assert_eq!(t.position(), Some(Position::new(chapter, verse)));
        t
    }

    // ---- penalties ---

    #[test]
    fn chapter_penalty_scales_and_caps() {
        assert_eq!(chapter_penalty(3, 3), 0.0);
        assert!((chapter_penalty(1, 2) - 10.0 / 144.0).abs() < 1e-12);
        assert!((chapter_penalty(5, 2) - 30.0 / 144.0).abs() < 1e-12);
        assert_eq!(chapter_penalty(1, 9), MAX_CHAPTER_PENALTY);
        assert_eq!(chapter_penalty(1, 114), MAX_CHAPTER_PENALTY);
    }

    #[test]
    fn verse_penalty_is_centred_on_next_verse() {
        assert_eq!(verse_penalty(5, 6, 7), 0.0);
        assert!((verse_penalty(5, 5, 7) - 1.0 / 7.0 / 144.0).abs() < 1e-12);
        assert!((verse_penalty(5, 1, 7) - 5.0 / 7.0 / 144.0).abs() < 1e-12);
    }

    // ---- bootstrap ---

    #[test]
    fn starts_unset() {
        let t = PositionTracker::new(corpus());
        assert_eq!(t.phase(), TrackerPhase::Unset);
        assert_eq!(t.current_chapter(), None);
    }

    #[test]
    fn bootstrap_takes_top_candidate_unconditionally() {
        let mut t = PositionTracker::new(corpus());
        let update = t.advance(&[cand(2, 3, 0.2), cand(1, 1, 0.1)]).unwrap();
        assert_eq!(update, Some(Position::new(2, 3)));
        assert_eq!(t.phase(), TrackerPhase::Tracking(Position::new(2, 3)));
    }

    #[test]
    fn bootstrap_with_no_candidates_stays_unset() {
        let mut t = PositionTracker::new(corpus());
        assert_eq!(t.advance(&[]).unwrap(), None);
        assert_eq!(t.phase(), TrackerPhase::Unset);
    }

    // ---- threshold ---

    #[test]
    fn low_scores_are_ignored() {
        let mut t = tracking(1, 5);
        assert_eq!(t.advance(&[cand(1, 6, 0.85)]).unwrap(), None);
        assert_eq!(t.advance(&[cand(1, 7, 0.5)]).unwrap(), None);
        assert_eq!(t.advance(&[]).unwrap(), None);
        assert_eq!(t.position(), Some(Position::new(1, 5)));
    }

    #[test]
    fn forward_move_is_accepted() {
        let mut t = tracking(1, 5);
        assert_eq!(
            t.advance(&[cand(1, 6, 1.2)]).unwrap(),
            Some(Position::new(1, 6))
        );
        assert_eq!(
            t.advance(&[cand(1, 7, 1.1)]).unwrap(),
            Some(Position::new(1, 7))
        );
    }

    #[test]
    fn penalties_reorder_candidates() {
        // 1:2 has the higher raw score but sits far behind; 1:6 wins after
        // the verse penalty.
        let mut t = tracking(1, 5);
        let update = t
            .advance(&[cand(1, 2, 1.0005), cand(1, 6, 1.0)])
            .unwrap();
        assert_eq!(update, Some(Position::new(1, 6)));
    }

    #[test]
    fn re_matching_current_verse_confirms_it() {
        let mut t = tracking(1, 5);
        assert_eq!(
            t.advance(&[cand(1, 5, 1.2)]).unwrap(),
            Some(Position::new(1, 5))
        );
    }

    // ---- chapter hysteresis ---

    #[test]
    fn switch_requires_five_detections() {
        let mut t = tracking(1, 5);

        for i in 1..SWITCH_CONFIRMATIONS {
            assert_eq!(t.advance(&[cand(2, 1, 1.5)]).unwrap(), None, "hit {i}");
            assert_eq!(t.current_chapter(), Some(1));
            assert_eq!(t.tracked().switch_count(2), i);
        }

        assert_eq!(
            t.advance(&[cand(2, 1, 1.5)]).unwrap(),
            Some(Position::new(2, 1))
        );
        assert_eq!(t.current_chapter(), Some(2));
        assert_eq!(t.tracked().switch_count(2), 0);
    }

    #[test]
    fn switch_evidence_survives_interleaved_segments() {
        let mut t = tracking(1, 5);
        for _ in 0..4 {
            assert_eq!(t.advance(&[cand(2, 1, 1.5)]).unwrap(), None);
        }
        assert_eq!(
            t.advance(&[cand(1, 6, 1.2)]).unwrap(),
            Some(Position::new(1, 6))
        );
        assert_eq!(
            t.advance(&[cand(2, 1, 1.5)]).unwrap(),
            Some(Position::new(2, 1))
        );
    }

    #[test]
    fn counters_are_per_chapter() {
        let mut t = tracking(1, 5);
        for _ in 0..4 {
            t.advance(&[cand(2, 1, 1.5)]).unwrap();
        }
        assert_eq!(t.advance(&[cand(3, 1, 1.5)]).unwrap(), None);
        assert_eq!(t.tracked().switch_count(3), 1);
        assert_eq!(t.tracked().switch_count(2), 4);
        assert_eq!(t.current_chapter(), Some(1));
    }

    #[test]
    fn suppressed_switch_does_not_fall_back_to_runner_up() {
        let mut t = tracking(1, 5);
        let update = t.advance(&[cand(2, 1, 1.5), cand(1, 6, 1.2)]).unwrap();
        assert_eq!(update, None);
        assert_eq!(t.position(), Some(Position::new(1, 5)));
    }

    // ---- look-ahead ---

    #[test]
    fn look_ahead_prefers_next_verse() {
        let mut t = tracking(1, 5);
        let update = t.advance(&[cand(1, 5, 0.95), cand(1, 6, 0.92)]).unwrap();
        assert_eq!(update, Some(Position::new(1, 6)));
    }

    #[test]
    fn look_ahead_needs_high_runner_up() {
        let mut t = tracking(1, 5);
        let update = t.advance(&[cand(1, 5, 0.95), cand(1, 6, 0.89)]).unwrap();
        assert_eq!(update, Some(Position::new(1, 5)));
    }

    #[test]
    fn look_ahead_only_for_immediate_successor() {
        let mut t = tracking(1, 3);
        let update = t.advance(&[cand(1, 3, 1.2), cand(1, 5, 1.1)]).unwrap();
        assert_eq!(update, Some(Position::new(1, 3)));
    }

    // ---- backward flicker ---

    #[test]
    fn previous_verse_is_never_adopted() {
        let mut t = tracking(1, 5);
        assert_eq!(t.advance(&[cand(1, 4, 1.99)]).unwrap(), None);
        assert_eq!(t.advance(&[cand(1, 4, 100.0)]).unwrap(), None);
        assert_eq!(t.position(), Some(Position::new(1, 5)));
    }

    #[test]
    fn larger_backward_jump_is_allowed() {
        let mut t = tracking(1, 5);
        assert_eq!(
            t.advance(&[cand(1, 2, 1.5)]).unwrap(),
            Some(Position::new(1, 2))
        );
    }

    // ---- invariants ---

    #[test]
    fn unknown_chapter_is_invariant_violation() {
        let mut t = tracking(1, 5);
        let err = t.advance(&[cand(9, 1, 1.5)]).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::InvariantViolation { chapter: 9, verse: 1, .. }
        ));
        assert_eq!(t.position(), Some(Position::new(1, 5)));
    }

    #[test]
    fn verse_out_of_range_is_invariant_violation() {
        let mut t = PositionTracker::new(corpus());
        assert!(t.advance(&[cand(3, 4, 1.5)]).is_err());
        assert!(t.advance(&[cand(1, 0, 1.5)]).is_err());
        assert_eq!(t.phase(), TrackerPhase::Unset);
    }

    #[test]
    fn nan_score_is_invariant_violation() {
        let mut t = tracking(1, 5);
        assert!(t.advance(&[cand(1, 6, f64::NAN)]).is_err());
    }

    #[test]
    fn reset_returns_to_unset() {
        let mut t = tracking(1, 5);
        t.advance(&[cand(2, 1, 1.5)]).unwrap();
        t.reset();
        assert_eq!(t.phase(), TrackerPhase::Unset);
        assert_eq!(t.tracked().switch_count(2), 0);
    }
}
