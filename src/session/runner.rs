//! Session driver: feeds finished segments through search and tracking.
//!
//! [`SessionDriver`] owns the [`PositionTracker`] and consumes segments from
//! a [`SegmentSlot`], so only one `transcribe → search → advance` cycle runs
//! at a time.
//!
//! # Segment flow
//!
//! ```text
//! SegmentSender::submit ─▶ SegmentSlot (depth 1, newest wins)
//!                              │
//!                              ▼
//! SessionDriver::run
//!   ├─ Segment::Audio → spawn_blocking(transcriber.transcribe)  [Transcribing]
//!   │                     └─ Err → warn, drop segment
//!   └─ text ─▶ normalise ─▶ < min tokens? drop
//!              ─▶ search(corpus, text, chapter filter, top_k)    [Tracking]
//!              ─▶ tracker.advance(candidates)
//!                   └─ moved → PositionUpdate (mpsc)
//! ```

use std::sync::{Arc, MutexGuard};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::{AppConfig, SearchConfig};
use crate::corpus::Corpus;
use crate::search::search;
use crate::text::{meets_token_minimum, normalize_arabic};
use crate::tracker::{Position, PositionTracker, TrackerError};

use super::gate::{Admission, SegmentSlot};
use super::state::{SessionPhase, SessionState, SharedSession};
use super::transcriber::{TranscribeError, Transcriber};

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Errors surfaced by the session driver.
///
/// Transcription failures are absorbed by [`SessionDriver::run`]; tracker
/// contract violations stop it.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Transcribe(#[from] TranscribeError),

    /// An audio segment arrived but no transcriber is configured.
    #[error("no transcriber configured for audio segments")]
    NoTranscriber,

    /// Internal / unexpected error (e.g. tokio join failure).
    #[error("internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// Segment / PositionUpdate
// ---------------------------------------------------------------------------

/// One finished unit of speech.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Already transcribed text.
    Text(String),
    /// 16 kHz mono PCM still to be transcribed.
    Audio(Vec<f32>),
}

/// Emitted whenever the tracked position changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    pub position: Position,
    /// Text of the verse now being recited.
    pub verse_text: String,
    /// Normalised transcript that caused the move.
    pub transcript: String,
}

// ---------------------------------------------------------------------------
// SegmentSender
// ---------------------------------------------------------------------------

/// Producer handle for a running [`SessionDriver`].  Cheap to clone.
#[derive(Clone)]
pub struct SegmentSender {
    slot: Arc<SegmentSlot<Segment>>,
}

impl SegmentSender {
    /// Hand a finished segment to the driver.
    ///
    /// A segment still waiting from an earlier call is discarded.
    pub fn submit(&self, segment: Segment) -> Admission {
        let admission = self.slot.offer(segment);
        match admission {
            Admission::Replaced => log::debug!("session: superseded a pending segment"),
            Admission::Closed => log::warn!("session: segment submitted after close"),
            Admission::Queued => {}
        }
        admission
    }

    /// Shorthand for `submit(Segment::Text(..))`.
    pub fn submit_text(&self, text: impl Into<String>) -> Admission {
        self.submit(Segment::Text(text.into()))
    }

    /// Let the driver finish the pending segment and stop.
    pub fn close(&self) {
        self.slot.close();
    }

    /// `true` while the driver is working on a segment.
    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }
}

// ---------------------------------------------------------------------------
// SessionDriver
// ---------------------------------------------------------------------------

/// Drives tracking for one recitation session.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use recitation_tracker::config::AppConfig;
/// use recitation_tracker::corpus::Corpus;
/// use recitation_tracker::session::{new_shared_session, SessionDriver};
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let corpus = Arc::new(Corpus::load(config.corpus.resolve_path()).unwrap());
/// let driver = SessionDriver::new(new_shared_session(), corpus, &config);
///
/// let sender = driver.sender();
/// let (update_tx, mut update_rx) = tokio::sync::mpsc::channel(16);
/// tokio::spawn(driver.run(update_tx));
///
/// sender.submit_text("بسم الله الرحمن الرحيم");
/// if let Some(update) = update_rx.recv().await {
///     println!("{}", update.position);
/// }
/// # }
/// ```
pub struct SessionDriver {
    state: SharedSession,
    slot: Arc<SegmentSlot<Segment>>,
    corpus: Arc<Corpus>,
    tracker: PositionTracker,
    transcriber: Option<Arc<dyn Transcriber>>,
    search: SearchConfig,
    normalize: bool,
}

impl SessionDriver {
    /// Create a driver with an unset tracker and no transcriber.
    pub fn new(state: SharedSession, corpus: Arc<Corpus>, config: &AppConfig) -> Self {
        Self {
            state,
            slot: Arc::new(SegmentSlot::new()),
            tracker: PositionTracker::new(Arc::clone(&corpus)),
            corpus,
            transcriber: None,
            search: config.search.clone(),
            normalize: config.session.normalize_transcripts,
        }
    }

    /// Enable [`Segment::Audio`] by supplying a speech-to-text engine.
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// A producer handle feeding this driver.
    pub fn sender(&self) -> SegmentSender {
        SegmentSender {
            slot: Arc::clone(&self.slot),
        }
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Process segments until the sender side closes the slot.
    ///
    /// The slot is closed when this returns, so later submissions report
    /// [`Admission::Closed`].
    ///
    /// # Errors
    ///
    /// Returns the first [`SessionError::Tracker`]; everything else is
    /// logged and the segment dropped.
    pub async fn run(mut self, updates: mpsc::Sender<PositionUpdate>) -> Result<(), SessionError> {
        let result = self.drain(&updates).await;
        self.slot.close();
        log::info!("session: driver shutting down");
        result
    }

    async fn drain(&mut self, updates: &mpsc::Sender<PositionUpdate>) -> Result<(), SessionError> {
        while let Some(segment) = self.slot.next().await {
            let result = self.handle_segment(segment).await;
            self.slot.finish();
            self.set_phase(SessionPhase::Idle);

            match result {
                Ok(Some(update)) => {
                    if updates.send(update).await.is_err() {
                        log::info!("session: update receiver dropped, stopping");
                        return Ok(());
                    }
                }
                Ok(None) => {}
                Err(e @ SessionError::Tracker(_)) => {
                    log::error!("session: {e}");
                    return Err(e);
                }
                Err(e) => {
                    log::warn!("session: dropping segment: {e}");
                    let mut st = self.lock_state();
                    st.segments_failed += 1;
                    st.last_error = Some(e.to_string());
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Segment handling
    // -----------------------------------------------------------------------

    async fn handle_segment(
        &mut self,
        segment: Segment,
    ) -> Result<Option<PositionUpdate>, SessionError> {
        let text = match segment {
            Segment::Text(text) => text,
            Segment::Audio(audio) => self.transcribe(audio).await?,
        };
        self.process_text(&text)
    }

    async fn transcribe(&self, audio: Vec<f32>) -> Result<String, SessionError> {
        let transcriber = self
            .transcriber
            .clone()
            .ok_or(SessionError::NoTranscriber)?;

        self.set_phase(SessionPhase::Transcribing);
        let samples = audio.len();
        let result = tokio::task::spawn_blocking(move || transcriber.transcribe(&audio)).await;

        match result {
            Ok(Ok(text)) => {
                log::debug!("session: transcribed {samples} samples → {:?}", text);
                Ok(text)
            }
            Ok(Err(e)) => Err(e.into()),
            Err(e) => Err(SessionError::Internal(e.to_string())),
        }
    }

    /// Track one transcript synchronously, bypassing the admission gate.
    ///
    /// Returns an update only when the tracked position changed.
    pub fn process_text(&mut self, raw: &str) -> Result<Option<PositionUpdate>, SessionError> {
        self.set_phase(SessionPhase::Tracking);
        let result = self.track(raw);
        self.set_phase(SessionPhase::Idle);
        result
    }

    fn track(&mut self, raw: &str) -> Result<Option<PositionUpdate>, SessionError> {
        let transcript = if self.normalize {
            normalize_arabic(raw)
        } else {
            raw.trim().to_string()
        };

        {
            let mut st = self.lock_state();
            st.segments_processed += 1;
            st.last_transcript = Some(transcript.clone());
        }

        if !meets_token_minimum(&transcript, self.search.min_query_tokens) {
            log::debug!(
                "session: {:?} shorter than {} tokens, skipped",
                transcript,
                self.search.min_query_tokens
            );
            self.lock_state().segments_skipped += 1;
            return Ok(None);
        }

        let restrict = if self.search.restrict_to_current_chapter {
            self.tracker.current_chapter()
        } else {
            None
        };
        let candidates = search(&self.corpus, &transcript, restrict, self.search.top_k);

        let previous = self.tracker.position();
        let Some(position) = self.tracker.advance(&candidates)? else {
            return Ok(None);
        };
        if previous == Some(position) {
            return Ok(None);
        }

        let verse_text = self
            .corpus
            .verse_at(position.chapter, position.verse)
            .map_err(|e| SessionError::Internal(e.to_string()))?
            .text
            .clone();

        {
            let mut st = self.lock_state();
            st.position = Some(position);
            st.verse_text = Some(verse_text.clone());
            st.updates_emitted += 1;
        }

        Ok(Some(PositionUpdate {
            position,
            verse_text,
            transcript,
        }))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.lock_state().phase = phase;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
