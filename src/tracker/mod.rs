//! Position tracking: turns ranked candidates into a stable (chapter, verse).
//!
//! # Architecture
//!
//! ```text
//! ranked candidates (per segment)
//!        │
//!        ▼
//! PositionTracker::advance()
//!        │
//!        ├─ Unset     → take the top candidate
//!        │
//!        └─ Tracking  → re-score with distance penalties
//!                       → drop ≤ 0.85
//!                       → other chapter?  count it, switch on the 5th hit
//!                       → prefer current + 1 when it scores ≥ 0.9
//!                       → ignore a step back to current − 1
//!                       → move
//! ```
//!
//! `Ok(None)` from [`PositionTracker::advance`] is the normal outcome for a
//! noisy or ambiguous segment.  `Err` is only returned for candidates that
//! do not address a verse of the corpus.

pub mod disambiguator;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use disambiguator::{
    chapter_penalty, verse_penalty, PositionTracker, TrackerError, ACCEPT_THRESHOLD,
    CHAPTER_DISTANCE_WEIGHT, DISTANCE_NORMALIZER, LOOK_AHEAD_THRESHOLD, MAX_CHAPTER_PENALTY,
    SWITCH_CONFIRMATIONS,
};
pub use state::{Position, TrackedPosition, TrackerPhase};
