//! Single-slot admission gate between segment producers and the driver.
//!
//! At most one segment is processed at a time and at most one waits behind
//! it.  A segment offered while another is still pending replaces it: the
//! newest speech is the only one worth tracking.
//!
//! ```text
//! offer(s1) ─▶ [pending: s1]           next() → s1   [busy]
//! offer(s2) ─▶ [pending: s2]  (busy)
//! offer(s3) ─▶ [pending: s3]  (s2 dropped)
//! finish()  ─▶ [pending: s3]           next() → s3   [busy]
//! ```

use std::sync::{Mutex, MutexGuard};

use tokio::sync::Notify;

// ---------------------------------------------------------------------------
// Admission
// ---------------------------------------------------------------------------

/// Outcome of [`SegmentSlot::offer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The slot was empty; the segment is pending.
    Queued,
    /// An older pending segment was discarded in favour of this one.
    Replaced,
    /// The slot is closed; the segment was discarded.
    Closed,
}

// ---------------------------------------------------------------------------
// SegmentSlot
// ---------------------------------------------------------------------------

struct SlotInner<T> {
    pending: Option<T>,
    busy: bool,
    closed: bool,
}

/// Depth-1, replace-on-overflow queue with a busy flag.
///
/// Share it behind an `Arc` between the producer side (`offer`) and the
/// single consumer (`next` / `finish`).
pub struct SegmentSlot<T> {
    inner: Mutex<SlotInner<T>>,
    notify: Notify,
}

impl<T> SegmentSlot<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                pending: None,
                busy: false,
                closed: false,
            }),
            notify: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotInner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Offer a segment, replacing any segment still waiting.
    pub fn offer(&self, item: T) -> Admission {
        let admission = {
            let mut inner = self.lock();
            if inner.closed {
                return Admission::Closed;
            }
            match inner.pending.replace(item) {
                Some(_) => Admission::Replaced,
                None => Admission::Queued,
            }
        };
        self.notify.notify_one();
        admission
    }

    /// Wait for the next pending segment and mark the slot busy.
    ///
    /// Returns `None` once the slot is closed and drained.  The caller must
    /// call [`finish`](Self::finish) when done with the segment.
    pub async fn next(&self) -> Option<T> {
        loop {
            {
                let mut inner = self.lock();
                if let Some(item) = inner.pending.take() {
                    inner.busy = true;
                    return Some(item);
                }
                if inner.closed {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Mark the in-flight segment as done.
    pub fn finish(&self) {
        self.lock().busy = false;
    }

    /// Stop accepting segments.  A pending segment is still delivered.
    pub fn close(&self) {
        self.lock().closed = true;
        self.notify.notify_one();
    }

    /// `true` while a segment taken by [`next`](Self::next) is unfinished.
    pub fn is_busy(&self) -> bool {
        self.lock().busy
    }

    pub fn has_pending(&self) -> bool {
        self.lock().pending.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl<T> Default for SegmentSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn delivers_offered_segment() {
        let slot = SegmentSlot::new();
        assert_eq!(slot.offer("a"), Admission::Queued);
        assert_eq!(slot.next().await, Some("a"));
        assert!(slot.is_busy());
        slot.finish();
        assert!(!slot.is_busy());
    }

    #[tokio::test]
    async fn newer_segment_replaces_pending_one() {
        let slot = SegmentSlot::new();
        assert_eq!(slot.offer(1), Admission::Queued);
        assert_eq!(slot.offer(2), Admission::Replaced);
        assert_eq!(slot.offer(3), Admission::Replaced);
        assert_eq!(slot.next().await, Some(3));
        assert!(!slot.has_pending());
    }

    #[tokio::test]
    async fn offers_while_busy_wait_behind_in_flight_segment() {
        let slot = SegmentSlot::new();
        slot.offer(1);
        assert_eq!(slot.next().await, Some(1));

        // Still busy with 1: only the latest of 2 and 3 is kept.
        slot.offer(2);
        assert_eq!(slot.offer(3), Admission::Replaced);
        assert!(slot.is_busy());

        slot.finish();
        assert_eq!(slot.next().await, Some(3));
    }

    #[tokio::test]
    async fn close_drains_then_ends() {
        let slot = SegmentSlot::new();
        slot.offer("last");
        slot.close();
        assert_eq!(slot.offer("late"), Admission::Closed);
        assert_eq!(slot.next().await, Some("last"));
        slot.finish();
        assert_eq!(slot.next().await, None);
        assert!(slot.is_closed());
    }

    #[tokio::test]
    async fn waiting_consumer_is_woken_by_offer() {
        let slot = Arc::new(SegmentSlot::new());
        let consumer = {
            let slot = Arc::clone(&slot);
            tokio::spawn(async move { slot.next().await })
        };
        tokio::task::yield_now().await;
        slot.offer(42);
        assert_eq!(consumer.await.unwrap(), Some(42));
    }
}
