//! Session driver for live recitation tracking.
//!
//! This module wires segment admission, optional speech-to-text, candidate
//! search and position tracking, and exposes the shared state a UI reads.
//!
//! # Architecture
//!
//! ```text
//! capture / VAD (external)
//!        │  finished segment
//!        ▼
//! SegmentSender::submit ──▶ SegmentSlot  (one pending, newest wins)
//!                                 │
//!                                 ▼
//!                   SessionDriver::run()  ← tokio task
//!                                 │
//!                                 ├─ Transcriber (spawn_blocking)
//!                                 ├─ search()
//!                                 └─ PositionTracker::advance()
//!                                          │
//!                                          ▼
//!                         PositionUpdate (mpsc) + SharedSession
//! ```

pub mod gate;
pub mod runner;
pub mod state;
pub mod transcriber;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use gate::{Admission, SegmentSlot};
pub use runner::{PositionUpdate, Segment, SegmentSender, SessionDriver, SessionError};
pub use state::{new_shared_session, SessionPhase, SessionState, SharedSession};
pub use transcriber::{TranscribeError, Transcriber};
