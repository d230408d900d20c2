//! Speech-to-text seam used by the session driver.
//!
//! # Overview
//!
//! [`Transcriber`] is the black box that turns one finished speech segment
//! into text.  It is object-safe and `Send + Sync` so it can be held behind
//! an `Arc<dyn Transcriber>` and called from the blocking thread pool.
//!
//! A test-only `MockTranscriber` returns a pre-configured response so the
//! driver can be exercised without a speech model.

use thiserror::Error;

// ---------------------------------------------------------------------------
// TranscribeError
// ---------------------------------------------------------------------------

/// Errors a [`Transcriber`] can report for one segment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranscribeError {
    /// No speech model is available.
    #[error("speech model unavailable: {0}")]
    ModelUnavailable(String),

    /// The inference pass failed.
    #[error("transcription failed: {0}")]
    Inference(String),

    /// The segment holds no audio.
    #[error("segment contains no audio")]
    EmptyAudio,
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Thread-safe interface for speech-to-text engines.
///
/// # Contract
///
/// - `audio` is 16 kHz, mono, f32 PCM.
/// - The returned text may be empty (silence); that is not an error.
pub trait Transcriber: Send + Sync {
    /// Transcribe one segment.
    fn transcribe(&self, audio: &[f32]) -> Result<String, TranscribeError>;
}

// Compile-time assertion: Box<dyn Transcriber> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Transcriber>) {}
};

// ---------------------------------------------------------------------------
// MockTranscriber
// ---------------------------------------------------------------------------

/// Stub engine that returns a fixed response for every non-empty segment.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    response: Result<String, TranscribeError>,
}

#[cfg(test)]
impl MockTranscriber {
    /// Always succeed with `text`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Always fail with `err`.
    pub fn err(err: TranscribeError) -> Self {
        Self { response: Err(err) }
    }
}

#[cfg(test)]
impl Transcriber for MockTranscriber {
    fn transcribe(&self, audio: &[f32]) -> Result<String, TranscribeError> {
        if audio.is_empty() {
            return Err(TranscribeError::EmptyAudio);
        }
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
