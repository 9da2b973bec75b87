//! L4 Atomic Layer: Time sources and interpolation helpers
//!
//! All engine time is expressed as a [`Duration`] since an arbitrary epoch
//! supplied by a [`Clock`], so tests can drive animations deterministically.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock {
    /// Time elapsed since the clock's epoch
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Manually advanced clock for tests and offline simulation
///
/// Clones share the same underlying time, so a test can keep one handle and
/// hand another to the component under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an absolute time
    pub fn set(&self, at: Duration) {
        self.now.set(at);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Animation progress (0.0 to 1.0) for `elapsed` out of `duration`
///
/// A zero duration is treated as already complete.
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Frame interval for a target frame rate (60fps fallback for 0)
#[inline]
pub fn frame_interval(fps: u32) -> Duration {
    if fps == 0 {
        Duration::from_millis(16)
    } else {
        Duration::from_nanos(1_000_000_000 / fps as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(-25.0, 25.0, 1.0) - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert!((progress(Duration::ZERO, Duration::ZERO) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_clamps() {
        let d = Duration::from_millis(800);
        assert!((progress(Duration::from_millis(400), d) - 0.5).abs() < 1e-9);
        assert_eq!(progress(Duration::from_secs(5), d), 1.0);
    }

    #[test]
    fn test_manual_clock_shares_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        clock.advance(Duration::from_millis(16));
        assert_eq!(handle.now(), Duration::from_millis(16));
        handle.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(0), Duration::from_millis(16));
        assert_eq!(frame_interval(50), Duration::from_millis(20));
    }
}
