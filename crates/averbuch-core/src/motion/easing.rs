//! L4 Atomic Layer: Pure easing curves
//!
//! Every curve maps [0, 1] onto [0, 1] with `f(0) = 0` and `f(1) = 1`.
//! Curves are used to reparametrize progress inside a keyframe segment and to
//! shape reveal transitions.

use serde::{Deserialize, Serialize};

/// Easing curve selection
///
/// Named CSS curves (`ease-out`, the Material `standard` curve) are kept as
/// their own variants so config files can refer to them by name. Names are
/// read through [`EasingCurve::from_name`], so `ease-out` and `ease_out` both
/// work; a table `{ cubic_bezier = [x1, y1, x2, y2] }` gives a custom curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", try_from = "CurveRepr")]
pub enum EasingCurve {
    /// Identity: f(t) = t
    #[default]
    Linear,
    /// Smoothstep: f(t) = t²(3 − 2t)
    Smoothstep,
    /// Cubic ease-out: f(t) = 1 − (1 − t)³
    EaseOutCubic,
    /// CSS `ease-out`, cubic-bezier(0, 0, 0.58, 1)
    EaseOut,
    /// CSS cubic-bezier(0.4, 0, 0.2, 1)
    Standard,
    /// Arbitrary CSS cubic-bezier(x1, y1, x2, y2)
    CubicBezier([f64; 4]),
    /// Jump: 0 at t = 0, 1 for any t > 0
    Step,
}

impl EasingCurve {
    /// Apply the curve to a progress value.
    ///
    /// Input is clamped to [0, 1].
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingCurve::Linear => t,
            EasingCurve::Smoothstep => smoothstep(t),
            EasingCurve::EaseOutCubic => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            EasingCurve::EaseOut => cubic_bezier(t, 0.0, 0.0, 0.58, 1.0),
            EasingCurve::Standard => cubic_bezier(t, 0.4, 0.0, 0.2, 1.0),
            EasingCurve::CubicBezier([x1, y1, x2, y2]) => cubic_bezier(t, *x1, *y1, *x2, *y2),
            EasingCurve::Step => {
                if t > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Parse a CSS-ish curve name (`linear`, `ease-out`, `smoothstep`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "linear" => Some(EasingCurve::Linear),
            "smoothstep" | "smooth_step" => Some(EasingCurve::Smoothstep),
            "ease_out_cubic" | "cubic" => Some(EasingCurve::EaseOutCubic),
            "ease_out" | "easeout" => Some(EasingCurve::EaseOut),
            "standard" => Some(EasingCurve::Standard),
            "step" | "step_start" => Some(EasingCurve::Step),
            _ => None,
        }
    }
}

/// Config form of a curve
#[derive(Deserialize)]
#[serde(untagged)]
enum CurveRepr {
    Name(String),
    Bezier { cubic_bezier: [f64; 4] },
}

impl TryFrom<CurveRepr> for EasingCurve {
    type Error = String;

    fn try_from(repr: CurveRepr) -> Result<Self, Self::Error> {
        match repr {
            CurveRepr::Name(name) => {
                EasingCurve::from_name(&name).ok_or_else(|| format!("unknown easing curve '{}'", name))
            }
            CurveRepr::Bezier { cubic_bezier } => Ok(EasingCurve::CubicBezier(cubic_bezier)),
        }
    }
}

/// Smoothstep: t²(3 − 2t)
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// CSS cubic-bezier timing function.
///
/// Solves `x(p) = t` with Newton-Raphson, falling back to bisection when the
/// slope flattens out.
fn cubic_bezier(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let mut p = t;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - t;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2);
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = t;
    for _ in 0..30 {
        let x = bezier_sample(p, x1, x2);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2)
}

/// B(p) = 3(1-p)²p·c1 + 3(1-p)p²·c2 + p³ in Horner form
#[inline]
fn bezier_sample(p: f64, c1: f64, c2: f64) -> f64 {
    let a = 1.0 - 3.0 * c2 + 3.0 * c1;
    let b = 3.0 * c2 - 6.0 * c1;
    let c = 3.0 * c1;
    ((a * p + b) * p + c) * p
}

#[inline]
fn bezier_slope(p: f64, c1: f64, c2: f64) -> f64 {
    let a = 1.0 - 3.0 * c2 + 3.0 * c1;
    let b = 3.0 * c2 - 6.0 * c1;
    let c = 3.0 * c1;
    (3.0 * a * p + 2.0 * b) * p + c
}
