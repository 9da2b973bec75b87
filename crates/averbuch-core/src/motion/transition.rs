//! L3 Molecular Layer: Time-based style transitions
//!
//! Hosts that cannot animate on their own (the terminal) sample a
//! [`StyleTransition`] every frame to play out the transition the engine
//! asked for.

use std::time::Duration;

use super::style::{Style, Transition};
use super::timing::progress;

/// One running transition between two styles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleTransition {
    from: Style,
    to: Style,
    transition: Transition,
    started_at: Duration,
}

impl StyleTransition {
    /// Start at `now`; delay counts from here
    pub fn new(from: Style, to: Style, transition: Transition, now: Duration) -> Self {
        Self {
            from,
            to,
            transition,
            started_at: now,
        }
    }

    pub fn target(&self) -> &Style {
        &self.to
    }

    /// Eased progress at `now`; 0 during the delay
    pub fn eased_progress(&self, now: Duration) -> f64 {
        let elapsed = now.saturating_sub(self.started_at);
        if elapsed < self.transition.delay {
            return 0.0;
        }
        let t = progress(elapsed - self.transition.delay, self.transition.duration);
        self.transition.curve.apply(t)
    }

    /// Style to present at `now`
    pub fn sample(&self, now: Duration) -> Style {
        if self.is_finished(now) {
            return self.to;
        }
        let t = self.eased_progress(now);
        self.from.merge(&Style::interpolate(&self.from, &self.to, t))
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now.saturating_sub(self.started_at) >= self.transition.delay + self.transition.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::easing::EasingCurve;
    use crate::motion::mapping::Measure;

    #[test]
    fn test_delay_then_linear_fade() {
        let transition = Transition::new(Duration::from_millis(800), EasingCurve::Linear)
            .with_delay(Duration::from_millis(200));
        let anim = StyleTransition::new(Style::hidden(30.0), Style::SHOWN, transition, Duration::ZERO);

        let during_delay = anim.sample(Duration::from_millis(100));
        assert_eq!(during_delay.opacity, Some(0.0));

        let mid = anim.sample(Duration::from_millis(600));
        assert_eq!(mid.opacity, Some(0.5));
        assert_eq!(mid.translate_y, Some(Measure::px(15.0)));

        assert!(anim.is_finished(Duration::from_millis(1000)));
        assert_eq!(anim.sample(Duration::from_secs(5)), Style::SHOWN);
    }

    #[test]
    fn test_instant_transition_finishes_immediately() {
        let anim = StyleTransition::new(Style::opacity(0.0), Style::opacity(1.0), Transition::INSTANT, Duration::from_secs(3));
        assert!(anim.is_finished(Duration::from_secs(3)));
        assert_eq!(anim.sample(Duration::from_secs(3)).opacity, Some(1.0));
    }
}
