//! L3 Molecular Layer: Page scroll animation
//!
//! Keyboard and wheel scrolling accumulate into a pending delta that is
//! turned into one eased animation per frame. In-page links (`#inquire`,
//! back to top) animate straight to their target.

use std::time::Duration;

use averbuch_core::motion::timing::{lerp, progress};
use averbuch_core::motion::{Clock, EasingCurve};
use averbuch_core::UiConfig;

#[derive(Debug, Clone, Copy)]
struct ActiveAnimation {
    start: Duration,
    from: f64,
    to: f64,
}

/// Smooth scroll controller working in document pixels
#[derive(Debug, Clone)]
pub struct ScrollAnimator<C: Clock> {
    clock: C,
    animation: Option<ActiveAnimation>,
    current: f64,
    pending_delta: f64,
    smooth: bool,
    duration: Duration,
    curve: EasingCurve,
}

impl<C: Clock> ScrollAnimator<C> {
    pub fn new(clock: C, config: &UiConfig) -> Self {
        Self {
            clock,
            animation: None,
            current: 0.0,
            pending_delta: 0.0,
            smooth: config.smooth_scroll && config.scroll_duration_ms > 0,
            duration: Duration::from_millis(config.scroll_duration_ms),
            curve: EasingCurve::EaseOutCubic,
        }
    }

    /// Turn animation off (reduced motion)
    pub fn set_smooth(&mut self, smooth: bool) {
        self.smooth = smooth && !self.duration.is_zero();
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether the next frame has scrolling work to do
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0.0
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Final position once the running animation ends
    pub fn target(&self) -> f64 {
        self.animation.map(|a| a.to).unwrap_or(self.current)
    }

    /// Jump without animating
    pub fn set(&mut self, offset: f64) {
        self.animation = None;
        self.pending_delta = 0.0;
        self.current = offset.max(0.0);
    }

    /// Animate to an absolute offset
    pub fn scroll_to(&mut self, target: f64, max_scroll: f64) {
        let target = target.clamp(0.0, max_scroll.max(0.0));
        self.pending_delta = 0.0;
        if !self.smooth {
            self.set(target);
            return;
        }
        if (self.current - target).abs() < f64::EPSILON {
            self.animation = None;
            return;
        }
        self.start(target);
    }

    /// Scroll by `delta` pixels; several calls within one frame are batched
    pub fn scroll_by(&mut self, delta: f64, max_scroll: f64) {
        if !self.smooth {
            self.set((self.current + delta).clamp(0.0, max_scroll.max(0.0)));
            return;
        }
        self.pending_delta += delta;
    }

    /// Advance and return the offset to present this frame
    pub fn update(&mut self, max_scroll: f64) -> f64 {
        let max_scroll = max_scroll.max(0.0);
        if self.pending_delta != 0.0 {
            let target = (self.target() + self.pending_delta).clamp(0.0, max_scroll);
            self.pending_delta = 0.0;
            if (target - self.current).abs() >= f64::EPSILON {
                self.start(target);
            }
        }

        if let Some(anim) = self.animation {
            let elapsed = self.clock.now().saturating_sub(anim.start);
            if elapsed >= self.duration {
                self.current = anim.to.min(max_scroll);
                self.animation = None;
            } else {
                let t = self.curve.apply(progress(elapsed, self.duration));
                self.current = lerp(anim.from, anim.to, t).min(max_scroll);
            }
        }

        self.current = self.current.min(max_scroll);
        self.current
    }

    pub fn cancel(&mut self) {
        self.animation = None;
        self.pending_delta = 0.0;
    }

    fn start(&mut self, to: f64) {
        self.animation = Some(ActiveAnimation {
            start: self.clock.now(),
            from: self.current,
            to,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use averbuch_core::motion::ManualClock;

    fn animator(smooth: bool) -> (ScrollAnimator<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let config = UiConfig {
            smooth_scroll: smooth,
            scroll_duration_ms: 400,
            ..Default::default()
        };
        (ScrollAnimator::new(clock.clone(), &config), clock)
    }

    #[test]
    fn test_instant_scroll_when_disabled() {
        let (mut scroll, _clock) = animator(false);
        scroll.scroll_to(500.0, 2000.0);
        assert_eq!(scroll.current(), 500.0);
        assert!(!scroll.is_animating());

        scroll.scroll_by(-800.0, 2000.0);
        assert_eq!(scroll.current(), 0.0);
    }

    #[test]
    fn test_anchor_animation_eases_to_target() {
        let (mut scroll, clock) = animator(true);
        scroll.scroll_to(1000.0, 2000.0);
        assert!(scroll.is_animating());

        clock.advance(Duration::from_millis(200));
        let mid = scroll.update(2000.0);
        // Ease-out: more than half way at half time
        assert!(mid > 500.0 && mid < 1000.0);

        clock.advance(Duration::from_millis(200));
        assert_eq!(scroll.update(2000.0), 1000.0);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn test_scroll_by_batching() {
        let (mut scroll, _clock) = animator(true);
        scroll.scroll_by(16.0, 2000.0);
        scroll.scroll_by(16.0, 2000.0);
        scroll.scroll_by(16.0, 2000.0);
        scroll.update(2000.0);
        assert_eq!(scroll.target(), 48.0);
    }

    #[test]
    fn test_scroll_clamps_to_max() {
        let (mut scroll, clock) = animator(true);
        scroll.scroll_to(5000.0, 1200.0);
        assert_eq!(scroll.target(), 1200.0);
        clock.advance(Duration::from_secs(1));
        assert_eq!(scroll.update(1200.0), 1200.0);
    }
}
