//! Tracked position state owned by [`PositionTracker`](super::PositionTracker).

use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A verse address emitted to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub chapter: u32,
    pub verse: u32,
}

impl Position {
    pub fn new(chapter: u32, verse: u32) -> Self {
        Self { chapter, verse }
    }
}

/// Zero-padded `CCC:VVV`, e.g. `002:255`.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}:{:03}", self.chapter, self.verse)
    }
}

// ---------------------------------------------------------------------------
// TrackerPhase
// ---------------------------------------------------------------------------

/// The two states of the tracking machine.  There is no terminal state.
///
/// ```text
/// Unset ──first candidate──▶ Tracking(c, v) ──accepted move──▶ Tracking(c', v')
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// No position confirmed yet.
    Unset,
    /// Following the reciter at this position.
    Tracking(Position),
}

// ---------------------------------------------------------------------------
// TrackedPosition
// ---------------------------------------------------------------------------

/// Current position plus per-chapter switch evidence.
///
/// `chapter == 0` iff nothing has been confirmed yet; `verse` is 0 in the
/// same case.  Counters only grow until a switch to their chapter is
/// accepted, then return to 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedPosition {
    pub chapter: u32,
    pub verse: u32,
    pub switch_counters: BTreeMap<u32, u32>,
}

impl TrackedPosition {
    /// The unset bootstrap state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.chapter != 0
    }

    /// `None` while unset.
    pub fn position(&self) -> Option<Position> {
        self.is_set()
            .then(|| Position::new(self.chapter, self.verse))
    }

    pub fn phase(&self) -> TrackerPhase {
        match self.position() {
            Some(p) => TrackerPhase::Tracking(p),
            None => TrackerPhase::Unset,
        }
    }

    /// Switch evidence collected so far for `chapter`.
    pub fn switch_count(&self, chapter: u32) -> u32 {
        self.switch_counters.get(&chapter).copied().unwrap_or(0)
    }

    pub(crate) fn move_to(&mut self, position: Position) {
        self.chapter = position.chapter;
        self.verse = position.verse;
    }

    /// Add one detection of `chapter` and return the new count.
    pub(crate) fn record_switch_evidence(&mut self, chapter: u32) -> u32 {
        let count = self.switch_counters.entry(chapter).or_insert(0);
        *count += 1;
        *count
    }

    pub(crate) fn clear_switch_evidence(&mut self, chapter: u32) {
        self.switch_counters.insert(chapter, 0);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
