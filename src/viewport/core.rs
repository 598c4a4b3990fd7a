//! Surface size tracking.
//!
//! Resize notifications may come from any thread through a [`ViewportFeed`].
//! The tracker keeps only the latest pending notice and publishes it once the
//! surface has been quiet for the settle window, so a drag-resize produces a
//! single recomputation instead of one per intermediate size.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use serde::{Deserialize, Serialize};

use crate::geometry::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Quiet period before a pending size is published.
    pub settle_ms: u64,
    /// Changes smaller than this on both axes are dropped.
    pub min_delta: u16,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            settle_ms: 50,
            min_delta: 1,
        }
    }
}

impl ViewportSettings {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Notices buffered between polls before the feed starts parking overflow.
pub const FEED_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy)]
struct ResizeNotice {
    size: Size,
    at: Instant,
    /// Issue order across every producer; the highest wins.
    seq: u64,
}

/// State shared between the tracker and its feeds.
#[derive(Debug, Default)]
struct FeedShared {
    seq: AtomicU64,
    /// Newest notice that did not fit in the channel.
    overflow: Mutex<Option<ResizeNotice>>,
    /// Overflow notices replaced before the tracker saw them.
    dropped: AtomicU64,
}

impl FeedShared {
    fn notice(&self, size: Size, at: Instant) -> ResizeNotice {
        ResizeNotice {
            size,
            at,
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
        }
    }

    fn park(&self, notice: ResizeNotice) {
        if let Ok(mut slot) = self.overflow.lock() {
            let newer = slot.is_none_or(|parked| parked.seq < notice.seq);
            if slot.is_some() {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            if newer {
                *slot = Some(notice);
            }
        }
    }

    fn take_parked(&self) -> Option<ResizeNotice> {
        self.overflow.lock().ok().and_then(|mut slot| slot.take())
    }

    fn has_parked(&self) -> bool {
        self.overflow.lock().is_ok_and(|slot| slot.is_some())
    }
}

/// Producer side handed to whatever observes the rendering surface.
///
/// The channel is bounded at [`FEED_CAPACITY`]; once it is full the newest
/// notice is parked beside it, so the latest size is never lost.
#[derive(Debug, Clone)]
pub struct ViewportFeed {
    tx: Sender<ResizeNotice>,
    shared: Arc<FeedShared>,
}

impl ViewportFeed {
    /// Report a new surface size. Returns `false` once the tracker is gone.
    pub fn notify(&self, size: Size) -> bool {
        self.notify_at(size, Instant::now())
    }

    pub fn notify_at(&self, size: Size, at: Instant) -> bool {
        let notice = self.shared.notice(size, at);
        match self.tx.try_send(notice) {
            Ok(()) => true,
            Err(TrySendError::Full(notice)) => {
                self.shared.park(notice);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

pub struct ViewportTracker {
    current: Size,
    settings: ViewportSettings,
    pending: Option<ResizeNotice>,
    coalesced: u64,
    tx: Sender<ResizeNotice>,
    rx: Receiver<ResizeNotice>,
    shared: Arc<FeedShared>,
}

impl ViewportTracker {
    /// Start from a caller-supplied baseline so the first layout does not
    /// depend on a live surface.
    pub fn new(baseline: Size, settings: ViewportSettings) -> Self {
        let (tx, rx) = bounded(FEED_CAPACITY);
        Self {
            current: baseline,
            settings,
            pending: None,
            coalesced: 0,
            tx,
            rx,
            shared: Arc::new(FeedShared::default()),
        }
    }

    pub fn feed(&self) -> ViewportFeed {
        ViewportFeed {
            tx: self.tx.clone(),
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn current(&self) -> Size {
        self.current
    }

    pub fn settings(&self) -> ViewportSettings {
        self.settings
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some() || !self.rx.is_empty() || self.shared.has_parked()
    }

    /// Record a notice observed on the caller's own thread.
    pub fn observe(&mut self, size: Size, at: Instant) {
        let notice = self.shared.notice(size, at);
        self.stage(notice);
    }

    /// Publish the pending size if it has settled by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<Size> {
        while let Ok(notice) = self.rx.try_recv() {
            self.stage(notice);
        }
        if let Some(notice) = self.shared.take_parked() {
            self.stage(notice);
        }
        let dropped = self.shared.dropped.swap(0, Ordering::Relaxed);
        self.coalesced = self.coalesced.saturating_add(dropped);

        let notice = self.pending?;
        if now.saturating_duration_since(notice.at) < self.settings.settle() {
            return None;
        }
        self.pending = None;
        self.apply(notice.size)
    }

    /// Apply `size` immediately, skipping the settle window.
    pub fn apply(&mut self, size: Size) -> Option<Size> {
        if size.max_delta(self.current) < self.settings.min_delta.max(1) {
            return None;
        }
        self.current = size;
        Some(size)
    }

    /// Number of notices superseded before publication since the last call.
    pub fn take_coalesced(&mut self) -> u64 {
        std::mem::take(&mut self.coalesced)
    }

    fn stage(&mut self, notice: ResizeNotice) {
        match self.pending {
            Some(pending) => {
                self.coalesced = self.coalesced.saturating_add(1);
                if pending.seq < notice.seq {
                    self.pending = Some(notice);
                }
            }
            None => self.pending = Some(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ViewportTracker {
        ViewportTracker::new(Size::new(80, 24), ViewportSettings::default())
    }

    #[test]
    fn baseline_is_reported_before_any_notice() {
        let mut tracker = tracker();
        assert_eq!(tracker.current(), Size::new(80, 24));
        assert_eq!(tracker.poll(Instant::now()), None);
    }

    #[test]
    fn notice_publishes_after_settle_window() {
        let mut tracker = tracker();
        let start = Instant::now();
        tracker.observe(Size::new(120, 40), start);

        assert_eq!(tracker.poll(start + Duration::from_millis(10)), None);
        assert!(tracker.has_pending());
        assert_eq!(
            tracker.poll(start + Duration::from_millis(60)),
            Some(Size::new(120, 40))
        );
        assert_eq!(tracker.current(), Size::new(120, 40));
        assert!(!tracker.has_pending());
    }

    #[test]
    fn burst_coalesces_to_last_size() {
        let mut tracker = tracker();
        let feed = tracker.feed();
        let start = Instant::now();
        for (i, width) in [90, 100, 110, 130].into_iter().enumerate() {
            feed.notify_at(Size::new(width, 30), start + Duration::from_millis(i as u64 * 5));
        }

        let settled = start + Duration::from_millis(200);
        assert_eq!(tracker.poll(settled), Some(Size::new(130, 30)));
        assert_eq!(tracker.take_coalesced(), 3);
        assert_eq!(tracker.poll(settled), None);
    }

    #[test]
    fn feed_works_across_threads() {
        let mut tracker = tracker();
        let feed = tracker.feed();
        let start = Instant::now();
        std::thread::spawn(move || {
            feed.notify_at(Size::new(100, 30), start);
        })
        .join()
        .unwrap();

        assert_eq!(
            tracker.poll(start + Duration::from_secs(1)),
            Some(Size::new(100, 30))
        );
    }

    #[test]
    fn unchanged_size_is_not_republished() {
        let mut tracker = tracker();
        let start = Instant::now();
        tracker.observe(Size::new(80, 24), start);
        assert_eq!(tracker.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn small_fluctuations_below_min_delta_are_ignored() {
        let settings = ViewportSettings {
            settle_ms: 0,
            min_delta: 3,
        };
        let mut tracker = ViewportTracker::new(Size::new(80, 24), settings);
        assert_eq!(tracker.apply(Size::new(82, 25)), None);
        assert_eq!(tracker.apply(Size::new(83, 24)), Some(Size::new(83, 24)));
    }

    #[test]
    fn burst_past_channel_capacity_keeps_latest_size() {
        let mut tracker = tracker();
        let feed = tracker.feed();
        let start = Instant::now();
        let burst = FEED_CAPACITY as u16 + 24;
        for step in 1..=burst {
            assert!(feed.notify_at(Size::new(80 + step, 30), start));
        }
        assert!(tracker.has_pending());

        let settled = start + Duration::from_millis(200);
        assert_eq!(tracker.poll(settled), Some(Size::new(80 + burst, 30)));
        assert_eq!(tracker.take_coalesced(), u64::from(burst) - 1);
        assert!(!tracker.has_pending());
    }

    #[test]
    fn later_local_observation_beats_earlier_feed_notice() {
        let mut tracker = tracker();
        let feed = tracker.feed();
        let start = Instant::now();
        feed.notify_at(Size::new(100, 30), start);
        tracker.observe(Size::new(140, 40), start);

        assert_eq!(
            tracker.poll(start + Duration::from_secs(1)),
            Some(Size::new(140, 40))
        );
    }

    #[test]
    fn dropped_tracker_closes_feed() {
        let tracker = tracker();
        let feed = tracker.feed();
        drop(tracker);
        assert!(!feed.notify(Size::new(10, 10)));
    }
}
