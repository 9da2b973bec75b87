//! L4 Atomic Layer: Geometry primitives
//!
//! Coordinates are document space: `y` grows downward and a viewport is a
//! rectangle whose `y` is the current scroll offset.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// A rectangle with no area cannot be measured
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Overlapping region, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Grow (positive margin) or shrink (negative margin) each side
    pub fn expand(&self, margin: &RootMargin) -> Rect {
        Rect::new(
            self.x - margin.left,
            self.y - margin.top,
            self.width + margin.left + margin.right,
            self.height + margin.top + margin.bottom,
        )
    }
}

/// Signed per-side adjustment applied to the viewport before intersection
/// tests, in the same order as CSS (`top right bottom left`)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin::uniform(0.0);

    pub const fn uniform(px: f64) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }

    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }
}

impl FromStr for RootMargin {
    type Err = Error;

    /// Accepts 1 to 4 CSS lengths in `px` (a bare `0` is allowed)
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split_whitespace()
            .map(parse_px)
            .collect::<Result<Vec<f64>>>()?;

        match values.as_slice() {
            [all] => Ok(RootMargin::uniform(*all)),
            [vertical, horizontal] => Ok(RootMargin::new(*vertical, *horizontal, *vertical, *horizontal)),
            [top, horizontal, bottom] => Ok(RootMargin::new(*top, *horizontal, *bottom, *horizontal)),
            [top, right, bottom, left] => Ok(RootMargin::new(*top, *right, *bottom, *left)),
            _ => Err(Error::InvalidMargin(format!(
                "expected 1 to 4 lengths, got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

fn parse_px(token: &str) -> Result<f64> {
    let number = token.strip_suffix("px").unwrap_or(token);
    let value: f64 = number
        .parse()
        .map_err(|_| Error::InvalidMargin(format!("'{}' is not a pixel length", token)))?;
    if number == token && value != 0.0 {
        return Err(Error::InvalidMargin(format!("'{}' is missing the px unit", token)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_margin() {
        let m: RootMargin = "-100px".parse().unwrap();
        assert_eq!(m, RootMargin::uniform(-100.0));
    }

    #[test]
    fn test_parse_four_sided_margin() {
        let m: RootMargin = "0px 0px -100px 0px".parse().unwrap();
        assert_eq!(m, RootMargin::new(0.0, 0.0, -100.0, 0.0));
    }

    #[test]
    fn test_parse_two_and_three_values() {
        let m: RootMargin = "10px 0".parse().unwrap();
        assert_eq!(m, RootMargin::new(10.0, 0.0, 10.0, 0.0));
        let m: RootMargin = "1px 2px 3px".parse().unwrap();
        assert_eq!(m, RootMargin::new(1.0, 2.0, 3.0, 2.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<RootMargin>().is_err());
        assert!("10".parse::<RootMargin>().is_err());
        assert!("abc".parse::<RootMargin>().is_err());
        assert!("1px 2px 3px 4px 5px".parse::<RootMargin>().is_err());
    }

    #[test]
    fn test_negative_margin_shrinks() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let shrunk = viewport.expand(&RootMargin::uniform(-100.0));
        assert_eq!(shrunk, Rect::new(100.0, 100.0, 600.0, 400.0));
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        let c = Rect::new(20.0, 20.0, 1.0, 1.0);
        assert_eq!(a.intersection(&c), None);
    }
}
