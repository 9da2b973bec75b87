//! Process-wide motion preferences
//!
//! Resolved once at startup and passed by value to every component that
//! schedules a transition. Nothing mutates it afterwards.

use std::time::Duration;

use tracing::info;

use super::style::Transition;

/// Environment variable that forces reduced motion (`1`, `true`, `yes`)
pub const REDUCED_MOTION_ENV: &str = "AVERBUCH_REDUCED_MOTION";

/// Immutable motion preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionPreferences {
    reduced_motion: bool,
}

impl MotionPreferences {
    pub const fn new(reduced_motion: bool) -> Self {
        Self { reduced_motion }
    }

    /// Combine the config setting, a command-line override and the environment
    pub fn resolve(config: bool, cli_override: bool) -> Self {
        let from_env = std::env::var(REDUCED_MOTION_ENV)
            .map(|v| env_flag(&v))
            .unwrap_or(false);
        let reduced_motion = config || cli_override || from_env;
        if reduced_motion {
            info!(config, cli_override, from_env, "Reduced motion enabled");
        }
        Self { reduced_motion }
    }

    #[inline]
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Transition as it should actually run under these preferences
    #[inline]
    pub fn transition(&self, transition: Transition) -> Transition {
        if self.reduced_motion {
            Transition {
                duration: Duration::ZERO,
                delay: Duration::ZERO,
                curve: transition.curve,
            }
        } else {
            transition
        }
    }
}

fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "reduce"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::easing::EasingCurve;

    #[test]
    fn test_reduced_motion_collapses_durations() {
        let t = Transition::new(Duration::from_millis(800), EasingCurve::Standard)
            .with_delay(Duration::from_millis(150));

        let normal = MotionPreferences::new(false).transition(t);
        assert_eq!(normal, t);

        let reduced = MotionPreferences::new(true).transition(t);
        assert!(reduced.is_instant());
        assert_eq!(reduced.curve, EasingCurve::Standard);
    }

    #[test]
    fn test_env_flag_values() {
        assert!(env_flag("1"));
        assert!(env_flag(" TRUE "));
        assert!(env_flag("reduce"));
        assert!(!env_flag("0"));
        assert!(!env_flag("no-preference"));
    }
}
