//! Page-load progress bar
//!
//! ```text
//! Loading --loaded()--> Holding (300ms) --> Fading (800ms) --> Removed
//! ```

use std::time::Duration;

use crate::motion::timing::progress;

/// Time the full bar stays visible before fading
pub const HOLD: Duration = Duration::from_millis(300);
/// Fade-out duration
pub const FADE: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingPhase {
    Loading,
    Holding,
    Fading,
    Removed,
}

/// Thin bar across the top of the page
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadingBar {
    loaded_at: Option<Duration>,
}

impl LoadingBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the page as loaded at `now`; later calls are ignored
    pub fn loaded(&mut self, now: Duration) {
        if self.loaded_at.is_none() {
            self.loaded_at = Some(now);
        }
    }

    pub fn phase(&self, now: Duration) -> LoadingPhase {
        let Some(at) = self.loaded_at else {
            return LoadingPhase::Loading;
        };
        let elapsed = now.saturating_sub(at);
        if elapsed < HOLD {
            LoadingPhase::Holding
        } else if elapsed < HOLD + FADE {
            LoadingPhase::Fading
        } else {
            LoadingPhase::Removed
        }
    }

    /// Filled fraction, 0 until loaded
    pub fn width(&self) -> f64 {
        if self.loaded_at.is_some() {
            1.0
        } else {
            0.0
        }
    }

    pub fn opacity(&self, now: Duration) -> f64 {
        match (self.phase(now), self.loaded_at) {
            (LoadingPhase::Fading, Some(at)) => {
                let fading_for = now.saturating_sub(at).saturating_sub(HOLD);
                1.0 - progress(fading_for, FADE)
            }
            (LoadingPhase::Removed, _) => 0.0,
            _ => 1.0,
        }
    }

    pub fn is_removed(&self, now: Duration) -> bool {
        self.phase(now) == LoadingPhase::Removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_bar_lifecycle() {
        let mut bar = LoadingBar::new();
        assert_eq!(bar.phase(Duration::from_secs(10)), LoadingPhase::Loading);
        assert_eq!(bar.width(), 0.0);

        let t0 = Duration::from_millis(500);
        bar.loaded(t0);
        assert_eq!(bar.width(), 1.0);
        assert_eq!(bar.phase(t0 + Duration::from_millis(299)), LoadingPhase::Holding);
        assert_eq!(bar.opacity(t0 + Duration::from_millis(299)), 1.0);

        let mid_fade = t0 + HOLD + Duration::from_millis(400);
        assert_eq!(bar.phase(mid_fade), LoadingPhase::Fading);
        assert!((bar.opacity(mid_fade) - 0.5).abs() < 1e-9);

        assert!(bar.is_removed(t0 + HOLD + FADE));
        assert_eq!(bar.opacity(t0 + HOLD + FADE), 0.0);
    }

    #[test]
    fn test_second_load_does_not_restart() {
        let mut bar = LoadingBar::new();
        bar.loaded(Duration::ZERO);
        bar.loaded(Duration::from_secs(1));
        assert!(bar.is_removed(Duration::from_millis(1100)));
    }
}
