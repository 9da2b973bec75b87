//! L4 Atomic Layer: Keyframe mapping
//!
//! Maps a progress scalar onto an output range through a piecewise curve:
//! locate the bracketing keyframes, reparametrize the local segment position
//! with an [`EasingCurve`], then interpolate linearly in output space.

use std::fmt;
use std::str::FromStr;

use super::easing::EasingCurve;
use super::timing::lerp;
use crate::{Error, Result};

/// Unit attached to a mapped output value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    /// Plain number (opacity, scale)
    #[default]
    Number,
    /// Pixels
    Px,
    /// Percentage of the element's own size
    Percent,
}

impl Unit {
    fn suffix(self) -> &'static str {
        match self {
            Unit::Number => "",
            Unit::Px => "px",
            Unit::Percent => "%",
        }
    }
}

/// A number with a unit, written like CSS: `"30%"`, `"-50px"`, `"0.5"`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measure {
    pub value: f64,
    pub unit: Unit,
}

impl Measure {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn number(value: f64) -> Self {
        Self::new(value, Unit::Number)
    }

    pub const fn px(value: f64) -> Self {
        Self::new(value, Unit::Px)
    }

    pub const fn percent(value: f64) -> Self {
        Self::new(value, Unit::Percent)
    }

    /// Resolve to pixels; percentages are relative to `reference`
    pub fn to_px(&self, reference: f64) -> f64 {
        match self.unit {
            Unit::Number | Unit::Px => self.value,
            Unit::Percent => self.value / 100.0 * reference,
        }
    }
}

impl FromStr for Measure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (number, unit) = if let Some(n) = s.strip_suffix('%') {
            (n, Unit::Percent)
        } else if let Some(n) = s.strip_suffix("px") {
            (n, Unit::Px)
        } else {
            (s, Unit::Number)
        };
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| Error::InvalidMeasure(format!("'{}' is not a number", s)))?;
        if !value.is_finite() {
            return Err(Error::InvalidMeasure(format!("'{}' is not finite", s)));
        }
        Ok(Measure::new(value, unit))
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Trim float noise so 0.5 * 30 prints as "15%", not "15.000000000000002%"
        let mut value = (self.value * 1e6).round() / 1e6;
        if value == 0.0 {
            value = 0.0;
        }
        write!(f, "{}{}", value, self.unit.suffix())
    }
}

/// An `(input, output)` anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub input: f64,
    pub output: f64,
}

impl Keyframe {
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

/// Validated keyframe sequence: at least two points, inputs non-decreasing
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes(Vec<Keyframe>);

impl Keyframes {
    pub fn new(frames: Vec<Keyframe>) -> Result<Self> {
        if frames.len() < 2 {
            return Err(Error::InvalidKeyframes(format!(
                "need at least 2 keyframes, got {}",
                frames.len()
            )));
        }
        if frames.iter().any(|k| !k.input.is_finite() || !k.output.is_finite()) {
            return Err(Error::InvalidKeyframes("keyframes must be finite".to_string()));
        }
        if let Some(pair) = frames.windows(2).find(|w| w[1].input < w[0].input) {
            return Err(Error::InvalidKeyframes(format!(
                "inputs must be non-decreasing ({} follows {})",
                pair[1].input, pair[0].input
            )));
        }
        Ok(Self(frames))
    }

    /// Build from parallel input/output slices
    pub fn from_slices(inputs: &[f64], outputs: &[f64]) -> Result<Self> {
        if inputs.len() != outputs.len() {
            return Err(Error::InvalidKeyframes(format!(
                "{} inputs but {} outputs",
                inputs.len(),
                outputs.len()
            )));
        }
        Self::new(
            inputs
                .iter()
                .zip(outputs)
                .map(|(&input, &output)| Keyframe::new(input, output))
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[Keyframe] {
        &self.0
    }

    fn first(&self) -> Keyframe {
        self.0[0]
    }

    fn last(&self) -> Keyframe {
        self.0[self.0.len() - 1]
    }
}

/// A configured progress → value mapping
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    keyframes: Keyframes,
    unit: Unit,
    curve: EasingCurve,
    clamp: bool,
}

impl Mapping {
    pub fn new(keyframes: Keyframes, unit: Unit) -> Self {
        Self {
            keyframes,
            unit,
            curve: EasingCurve::Linear,
            clamp: true,
        }
    }

    /// Plain numeric outputs, e.g. opacity `[0, 0.5] → [1, 0]`
    pub fn numeric(inputs: &[f64], outputs: &[f64]) -> Result<Self> {
        Ok(Self::new(Keyframes::from_slices(inputs, outputs)?, Unit::Number))
    }

    /// CSS-like outputs, e.g. `[0, 1] → ["-25%", "25%"]`.
    ///
    /// All outputs must share a unit; unitless zeros adopt the others' unit.
    pub fn measures(inputs: &[f64], outputs: &[&str]) -> Result<Self> {
        let parsed = outputs
            .iter()
            .map(|s| s.parse::<Measure>())
            .collect::<Result<Vec<_>>>()?;

        let unit = parsed
            .iter()
            .map(|m| m.unit)
            .find(|u| *u != Unit::Number)
            .unwrap_or(Unit::Number);
        if let Some(odd) = parsed
            .iter()
            .find(|m| m.unit != unit && !(m.unit == Unit::Number && m.value == 0.0))
        {
            return Err(Error::InvalidKeyframes(format!(
                "mixed units: '{}' in a {:?} mapping",
                odd, unit
            )));
        }

        let values: Vec<f64> = parsed.iter().map(|m| m.value).collect();
        Ok(Self::new(Keyframes::from_slices(inputs, &values)?, unit))
    }

    pub fn with_curve(mut self, curve: EasingCurve) -> Self {
        self.curve = curve;
        self
    }

    /// Let progress outside the keyframe domain extrapolate linearly
    pub fn unclamped(mut self) -> Self {
        self.clamp = false;
        self
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn curve(&self) -> EasingCurve {
        self.curve
    }

    pub fn keyframes(&self) -> &Keyframes {
        &self.keyframes
    }

    /// Map progress to an output value
    pub fn map(&self, progress: f64) -> f64 {
        let first = self.keyframes.first();
        let last = self.keyframes.last();
        let frames = self.keyframes.as_slice();

        let p = if self.clamp {
            progress.clamp(first.input, last.input)
        } else {
            progress
        };

        if p < first.input {
            return extrapolate(frames[0], frames[1], p);
        }
        if p > last.input {
            return extrapolate(frames[frames.len() - 2], last, p);
        }

        for pair in frames.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if p <= b.input {
                let span = b.input - a.input;
                if span <= 0.0 {
                    return b.output;
                }
                let t = (p - a.input) / span;
                return lerp(a.output, b.output, self.curve.apply(t));
            }
        }

        last.output
    }

    /// Map progress to a value carrying this mapping's unit
    pub fn map_measure(&self, progress: f64) -> Measure {
        Measure::new(self.map(progress), self.unit)
    }
}

/// Continue the segment `a → b` linearly beyond its ends
fn extrapolate(a: Keyframe, b: Keyframe, p: f64) -> f64 {
    let span = b.input - a.input;
    if span <= 0.0 {
        return if p < a.input { a.output } else { b.output };
    }
    lerp(a.output, b.output, (p - a.input) / span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_percent_offset_midpoint() {
        let mapping = Mapping::measures(&[0.0, 1.0], &["0%", "30%"]).unwrap();
        assert_eq!(mapping.map_measure(0.5).to_string(), "15%");
    }

    #[test]
    fn test_endpoints_hit_exactly() {
        let mapping = Mapping::numeric(&[0.2, 0.8], &[10.0, -10.0])
            .unwrap()
            .with_curve(EasingCurve::Smoothstep);
        assert_eq!(mapping.map(0.2), 10.0);
        assert_eq!(mapping.map(0.8), -10.0);
    }

    #[test]
    fn test_monotonic_for_increasing_outputs() {
        for curve in [EasingCurve::Linear, EasingCurve::Smoothstep, EasingCurve::EaseOut] {
            let mapping = Mapping::numeric(&[0.0, 1.0], &[-25.0, 25.0]).unwrap().with_curve(curve);
            let mut prev = f64::NEG_INFINITY;
            for i in 0..=100 {
                let v = mapping.map(i as f64 / 100.0);
                assert!(v >= prev, "{:?} decreased at step {}", curve, i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_multi_segment_fade() {
        // Fade in, hold, fade out
        let mapping = Mapping::numeric(&[0.0, 0.3, 0.7, 1.0], &[0.0, 1.0, 1.0, 0.0])
            .unwrap()
            .with_curve(EasingCurve::Smoothstep);
        assert_eq!(mapping.map(0.0), 0.0);
        assert_eq!(mapping.map(0.3), 1.0);
        assert_eq!(mapping.map(0.5), 1.0);
        assert_eq!(mapping.map(1.0), 0.0);
        // Smoothstep per segment: midpoint of the first segment is exactly 0.5
        assert!((mapping.map(0.15) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_clamped_outside_domain() {
        let mapping = Mapping::numeric(&[0.0, 0.5], &[1.0, 0.0]).unwrap();
        assert_eq!(mapping.map(-1.0), 1.0);
        assert_eq!(mapping.map(0.9), 0.0);
    }

    #[test]
    fn test_unclamped_extrapolates_linearly() {
        let mapping = Mapping::numeric(&[0.0, 1.0], &[0.0, 100.0])
            .unwrap()
            .with_curve(EasingCurve::Smoothstep)
            .unclamped();
        assert!((mapping.map(1.2) - 120.0).abs() < 1e-9);
        assert!((mapping.map(-0.1) + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_keyframes() {
        let mapping = Mapping::numeric(&[0.0, 0.5, 0.5, 1.0], &[0.0, 0.0, 1.0, 1.0]).unwrap();
        assert_eq!(mapping.map(0.25), 0.0);
        assert_eq!(mapping.map(0.75), 1.0);
    }

    #[test]
    fn test_invalid_keyframes() {
        assert!(Mapping::numeric(&[0.0], &[1.0]).is_err());
        assert!(Mapping::numeric(&[0.5, 0.2], &[0.0, 1.0]).is_err());
        assert!(Mapping::numeric(&[0.0, 1.0], &[0.0]).is_err());
        assert!(Mapping::numeric(&[0.0, f64::NAN], &[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_measures_units() {
        let m = Mapping::measures(&[0.0, 0.5], &["0", "-50px"]).unwrap();
        assert_eq!(m.unit(), Unit::Px);
        assert_eq!(m.map_measure(0.5).to_string(), "-50px");
        assert!(Mapping::measures(&[0.0, 1.0], &["10px", "30%"]).is_err());
        assert!(Mapping::measures(&[0.0, 1.0], &["abc", "30%"]).is_err());
    }

    #[test]
    fn test_measure_to_px() {
        assert_eq!(Measure::percent(50.0).to_px(400.0), 200.0);
        assert_eq!(Measure::px(12.0).to_px(400.0), 12.0);
    }

    fn any_curve() -> impl Strategy<Value = EasingCurve> {
        prop_oneof![
            Just(EasingCurve::Linear),
            Just(EasingCurve::Smoothstep),
            Just(EasingCurve::EaseOutCubic),
            Just(EasingCurve::EaseOut),
            Just(EasingCurve::Standard),
        ]
    }

    proptest! {
        #[test]
        fn prop_two_point_mapping_hits_both_keyframes(
            in0 in 0.0f64..0.9,
            width in 0.01f64..1.0,
            out0 in -1000.0f64..1000.0,
            out1 in -1000.0f64..1000.0,
            curve in any_curve(),
        ) {
            let in1 = in0 + width;
            let mapping = Mapping::numeric(&[in0, in1], &[out0, out1]).unwrap().with_curve(curve);
            let tolerance = 1e-6 * (1.0 + out0.abs() + out1.abs());
            prop_assert!((mapping.map(in0) - out0).abs() <= tolerance);
            prop_assert!((mapping.map(in1) - out1).abs() <= tolerance);
        }

        #[test]
        fn prop_two_point_mapping_is_monotonic(
            out0 in -1000.0f64..1000.0,
            rise in 0.0f64..1000.0,
            a in 0.0f64..=1.0,
            b in 0.0f64..=1.0,
            curve in any_curve(),
        ) {
            let mapping = Mapping::numeric(&[0.0, 1.0], &[out0, out0 + rise]).unwrap().with_curve(curve);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(mapping.map(lo) <= mapping.map(hi) + 1e-6 * (1.0 + rise));
        }

        #[test]
        fn prop_clamped_mapping_stays_within_outputs(
            out0 in -1000.0f64..1000.0,
            out1 in -1000.0f64..1000.0,
            p in -10.0f64..10.0,
            curve in any_curve(),
        ) {
            let mapping = Mapping::numeric(&[0.0, 1.0], &[out0, out1]).unwrap().with_curve(curve);
            let v = mapping.map(p);
            let tolerance = 1e-6 * (1.0 + out0.abs() + out1.abs());
            prop_assert!(v >= out0.min(out1) - tolerance && v <= out0.max(out1) + tolerance);
        }
    }
}
