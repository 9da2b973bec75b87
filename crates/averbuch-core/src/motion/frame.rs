//! L3 Molecular Layer: Frame scheduling
//!
//! [`FrameScheduler`] coalesces update requests so at most one callback runs per
//! display refresh. [`FrameTicker`] decides when a refresh is due, driven by an
//! injectable [`Clock`].

use std::time::Duration;

use tracing::trace;

use super::timing::{frame_interval, Clock};

/// At-most-one-per-refresh update slot
///
/// Callbacks read live state when they run, so dropping a request while one is
/// already pending loses nothing.
#[derive(Debug)]
pub struct FrameScheduler<F> {
    pending: Option<F>,
    requested: u64,
    executed: u64,
}

impl<F> Default for FrameScheduler<F> {
    fn default() -> Self {
        Self {
            pending: None,
            requested: 0,
            executed: 0,
        }
    }
}

impl<F> FrameScheduler<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `callback` for the next refresh.
    ///
    /// Returns `false` (and drops `callback`) if an update is already pending.
    pub fn request_update(&mut self, callback: F) -> bool {
        self.requested += 1;
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(callback);
        true
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending callback, clearing the pending flag
    pub fn take(&mut self) -> Option<F> {
        let callback = self.pending.take();
        if callback.is_some() {
            self.executed += 1;
        }
        callback
    }

    /// Run the pending callback against `state`; returns how many ran (0 or 1)
    pub fn run_frame<S: ?Sized>(&mut self, state: &mut S) -> usize
    where
        F: FnOnce(&mut S),
    {
        match self.take() {
            Some(callback) => {
                callback(state);
                1
            }
            None => 0,
        }
    }

    /// Drop any pending callback without running it
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Requests received and callbacks executed so far
    pub fn stats(&self) -> (u64, u64) {
        (self.requested, self.executed)
    }
}

/// Clock-driven display refresh
#[derive(Debug)]
pub struct FrameTicker<C> {
    clock: C,
    interval: Duration,
    last_frame: Option<Duration>,
    running: bool,
}

impl<C: Clock> FrameTicker<C> {
    pub fn new(clock: C, fps: u32) -> Self {
        Self {
            clock,
            interval: frame_interval(fps),
            last_frame: None,
            running: true,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a frame is due now. Marks the frame as started if so.
    pub fn poll(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let now = self.clock.now();
        let due = match self.last_frame {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        };
        if due {
            trace!(?now, "Frame due");
            self.last_frame = Some(now);
        }
        due
    }

    /// Time until the next frame is due (zero if overdue)
    pub fn until_next(&self) -> Duration {
        match self.last_frame {
            None => Duration::ZERO,
            Some(last) => (last + self.interval).saturating_sub(self.clock.now()),
        }
    }

    /// Stop producing frames; permanent
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
