//! Session phase and shared session state.
//!
//! [`SessionPhase`] mirrors what the driver is doing with the current
//! segment.  [`SessionState`] is everything a UI needs to render the active
//! verse and some counters; [`SharedSession`] is the `Arc<Mutex<…>>` handle
//! both sides hold.

use std::sync::{Arc, Mutex};

use crate::tracker::Position;

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// What the driver is doing.
///
/// ```text
/// Idle ──audio segment──▶ Transcribing ──text──▶ Tracking ──▶ Idle
/// Idle ──text segment───────────────────────────▶ Tracking ──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Waiting for the next segment.
    #[default]
    Idle,
    /// Running speech-to-text on the blocking thread pool.
    Transcribing,
    /// Searching the corpus and updating the tracked position.
    Tracking,
}

impl SessionPhase {
    /// `true` while a segment is in flight.
    ///
    /// ```
    /// use recitation_tracker::session::SessionPhase;
    ///
    /// assert!(!SessionPhase::Idle.is_busy());
    /// assert!(SessionPhase::Transcribing.is_busy());
    /// assert!(SessionPhase::Tracking.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        !matches!(self, SessionPhase::Idle)
    }

    /// Short status-bar label.
    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "Listening",
            SessionPhase::Transcribing => "Transcribing",
            SessionPhase::Tracking => "Tracking",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Shared session state, mutated by the driver and read by the UI.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: SessionPhase,

    /// Tracked position; `None` until the first segment matches.
    pub position: Option<Position>,

    /// Text of the verse at `position`.
    pub verse_text: Option<String>,

    /// Most recent transcript, after normalisation.
    pub last_transcript: Option<String>,

    /// Segments taken from the admission gate.
    pub segments_processed: u64,

    /// Segments too short to search.
    pub segments_skipped: u64,

    /// Segments whose transcription failed.
    pub segments_failed: u64,

    /// Position changes reported to the caller.
    pub updates_emitted: u64,

    /// Last transcription failure, for display.
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// SharedSession
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`SessionState`].
///
/// Do **not** hold the lock across `.await` points.
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Construct a new [`SharedSession`] in the idle state.
pub fn new_shared_session() -> SharedSession {
    Arc::new(Mutex::new(SessionState::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
