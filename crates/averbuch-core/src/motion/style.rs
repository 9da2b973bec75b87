//! L4 Atomic Layer: Presentation properties
//!
//! A [`Style`] is a partial set of animated properties. Fields left as `None`
//! are untouched when the style is applied, so a binding that only drives
//! opacity never clobbers an offset written by another binding.

use std::time::Duration;

use super::easing::EasingCurve;
use super::mapping::Measure;
use super::timing::lerp;

/// Animated properties of one element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    pub opacity: Option<f64>,
    pub translate_x: Option<Measure>,
    pub translate_y: Option<Measure>,
    /// Horizontal scale about the element's centre
    pub scale_x: Option<f64>,
}

impl Style {
    /// Fully visible at rest
    pub const SHOWN: Style = Style {
        opacity: Some(1.0),
        translate_x: None,
        translate_y: Some(Measure::px(0.0)),
        scale_x: None,
    };

    /// Transparent and pushed down by `offset` pixels
    pub fn hidden(offset: f64) -> Self {
        Self {
            opacity: Some(0.0),
            translate_x: None,
            translate_y: Some(Measure::px(offset)),
            scale_x: None,
        }
    }

    pub fn opacity(value: f64) -> Self {
        Self {
            opacity: Some(value),
            ..Default::default()
        }
    }

    /// Scaled horizontally only, e.g. a divider drawing itself out
    pub fn scale_x(value: f64) -> Self {
        Self {
            scale_x: Some(value),
            ..Default::default()
        }
    }

    pub fn with_opacity(mut self, value: f64) -> Self {
        self.opacity = Some(value);
        self
    }

    pub fn with_translate_x(mut self, value: Measure) -> Self {
        self.translate_x = Some(value);
        self
    }

    pub fn with_translate_y(mut self, value: Measure) -> Self {
        self.translate_y = Some(value);
        self
    }

    pub fn with_scale_x(mut self, value: f64) -> Self {
        self.scale_x = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.opacity.is_none() && self.translate_x.is_none() && self.translate_y.is_none() && self.scale_x.is_none()
    }

    /// Overlay `other` on top of `self`
    pub fn merge(&self, other: &Style) -> Style {
        Style {
            opacity: other.opacity.or(self.opacity),
            translate_x: other.translate_x.or(self.translate_x),
            translate_y: other.translate_y.or(self.translate_y),
            scale_x: other.scale_x.or(self.scale_x),
        }
    }

    /// Interpolate every property present in `to`; `from` supplies the origin
    /// (missing origins default to the target, i.e. no motion)
    pub fn interpolate(from: &Style, to: &Style, t: f64) -> Style {
        fn mix(a: Option<Measure>, b: Option<Measure>, t: f64) -> Option<Measure> {
            b.map(|b| {
                let a = a.filter(|a| a.unit == b.unit).unwrap_or(b);
                Measure::new(lerp(a.value, b.value, t), b.unit)
            })
        }
        Style {
            opacity: to.opacity.map(|b| lerp(from.opacity.unwrap_or(b), b, t)),
            translate_x: mix(from.translate_x, to.translate_x, t),
            translate_y: mix(from.translate_y, to.translate_y, t),
            scale_x: to.scale_x.map(|b| lerp(from.scale_x.unwrap_or(b), b, t)),
        }
    }
}

/// How a style change should be animated by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub delay: Duration,
    pub curve: EasingCurve,
}

impl Transition {
    /// Apply immediately
    pub const INSTANT: Transition = Transition {
        duration: Duration::ZERO,
        delay: Duration::ZERO,
        curve: EasingCurve::Linear,
    };

    pub fn new(duration: Duration, curve: EasingCurve) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            curve,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn is_instant(&self) -> bool {
        self.duration.is_zero() && self.delay.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let base = Style::hidden(30.0);
        let merged = base.merge(&Style::opacity(0.4));
        assert_eq!(merged.opacity, Some(0.4));
        assert_eq!(merged.translate_y, Some(Measure::px(30.0)));
    }

    #[test]
    fn test_interpolate_halfway() {
        let mid = Style::interpolate(&Style::hidden(30.0), &Style::SHOWN, 0.5);
        assert_eq!(mid.opacity, Some(0.5));
        assert_eq!(mid.translate_y, Some(Measure::px(15.0)));
        assert_eq!(mid.translate_x, None);
    }

    #[test]
    fn test_scale_interpolates_and_merges() {
        let drawn = Style::scale_x(0.0).merge(&Style::opacity(1.0));
        assert_eq!(drawn.scale_x, Some(0.0));
        let mid = Style::interpolate(&drawn, &Style::scale_x(1.0), 0.25);
        assert_eq!(mid.scale_x, Some(0.25));
        assert_eq!(mid.opacity, None);
        assert!(!Style::scale_x(1.0).is_empty());
    }

    #[test]
    fn test_interpolate_missing_origin_jumps() {
        let mid = Style::interpolate(&Style::default(), &Style::opacity(1.0), 0.25);
        assert_eq!(mid.opacity, Some(1.0));
    }
}
