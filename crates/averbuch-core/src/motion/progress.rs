//! L4 Atomic Layer: Progress sources
//!
//! Turns raw scroll offsets and element geometry into a normalized progress
//! scalar. Two flavours exist:
//! - [`ScrollSource`]: continuous progress across a [`ScrollRange`]
//! - [`IntersectionSource`]: binary "has entered the viewport" progress

use std::fmt;
use std::str::FromStr;

use super::geometry::{Rect, RootMargin};
use crate::{Error, Result};

/// Reference point on an element or on the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Center,
    End,
}

impl Anchor {
    #[inline]
    fn fraction(self) -> f64 {
        match self {
            Anchor::Start => 0.0,
            Anchor::Center => 0.5,
            Anchor::End => 1.0,
        }
    }
}

impl FromStr for Anchor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(Anchor::Start),
            "center" => Ok(Anchor::Center),
            "end" => Ok(Anchor::End),
            other => Err(Error::InvalidRange(format!("unknown anchor '{}'", other))),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Anchor::Start => "start",
            Anchor::Center => "center",
            Anchor::End => "end",
        })
    }
}

/// "Element anchor meets viewport anchor", written `"<element> <viewport>"`
///
/// `"start end"` is reached when the element's top touches the viewport's
/// bottom; `"end start"` when the element's bottom leaves the viewport's top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl Edge {
    pub const fn new(element: Anchor, viewport: Anchor) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which this edge is reached
    #[inline]
    pub fn scroll_offset(&self, element: &Rect, viewport_height: f64) -> f64 {
        element.top() + element.height * self.element.fraction()
            - viewport_height * self.viewport.fraction()
    }
}

impl FromStr for Edge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(element), Some(viewport), None) => Ok(Edge::new(element.parse()?, viewport.parse()?)),
            _ => Err(Error::InvalidRange(format!(
                "edge must be '<element> <viewport>', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

/// Domain over which scroll progress is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRange {
    start: Edge,
    end: Edge,
}

impl ScrollRange {
    /// Create a range; the two edges must differ
    pub fn new(start: Edge, end: Edge) -> Result<Self> {
        if start == end {
            return Err(Error::InvalidRange(format!(
                "start and end edges are both '{}'",
                start
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse from a pair of edge strings, e.g. `("start end", "end start")`
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(start.parse()?, end.parse()?)
    }

    /// From entering at the bottom of the viewport to leaving at the top
    pub fn traversal() -> Self {
        Self {
            start: Edge::new(Anchor::Start, Anchor::End),
            end: Edge::new(Anchor::End, Anchor::Start),
        }
    }

    /// From the element's top at the viewport top until its bottom passes it
    pub fn exit() -> Self {
        Self {
            start: Edge::new(Anchor::Start, Anchor::Start),
            end: Edge::new(Anchor::End, Anchor::Start),
        }
    }

    pub fn start(&self) -> Edge {
        self.start
    }

    pub fn end(&self) -> Edge {
        self.end
    }

    /// Scroll offsets `(start, end)` for the given element geometry
    pub fn resolve(&self, element: &Rect, viewport_height: f64) -> (f64, f64) {
        (
            self.start.scroll_offset(element, viewport_height),
            self.end.scroll_offset(element, viewport_height),
        )
    }
}

/// `(scroll - start) / (end - start)`, clamped to [0, 1] unless `clamp` is false
///
/// A degenerate span yields a constant 0.
#[inline]
pub fn scroll_progress(scroll: f64, start: f64, end: f64, clamp: bool) -> f64 {
    let span = end - start;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    let p = (scroll - start) / span;
    if clamp {
        p.clamp(0.0, 1.0)
    } else {
        p
    }
}

/// Scroll-linked progress for one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSource {
    pub range: ScrollRange,
    /// Keep progress in [0, 1]; disable for parallax that should keep drifting
    pub clamp: bool,
}

impl ScrollSource {
    pub fn new(range: ScrollRange) -> Self {
        Self { range, clamp: true }
    }

    pub fn unclamped(mut self) -> Self {
        self.clamp = false;
        self
    }

    /// Progress for the current scroll offset.
    ///
    /// Returns `None` if the element is detached or has no measurable size.
    pub fn progress(&self, scroll: f64, element: Option<Rect>, viewport_height: f64) -> Option<f64> {
        let element = element.filter(|rect| !rect.is_empty())?;
        let (start, end) = self.range.resolve(&element, viewport_height);
        Some(scroll_progress(scroll, start, end, self.clamp))
    }
}

/// Visibility-based progress: 0 until the element is sufficiently visible
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionSource {
    /// Minimum visible fraction in [0, 1]; 0 means "any overlap"
    pub threshold: f64,
    pub margin: RootMargin,
}

impl IntersectionSource {
    pub fn new(threshold: f64, margin: RootMargin) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            margin,
        }
    }

    /// Visible fraction of `element` inside the margin-adjusted `viewport`.
    ///
    /// Returns `None` for an unmeasurable element.
    pub fn ratio(&self, element: Option<Rect>, viewport: &Rect) -> Option<f64> {
        intersection_ratio(element?, viewport, &self.margin)
    }

    /// Whether a reported ratio counts as having entered the viewport
    #[inline]
    pub fn is_entered(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }

    /// Binary progress for a reported ratio
    #[inline]
    pub fn progress(&self, ratio: f64) -> f64 {
        if self.is_entered(ratio) {
            1.0
        } else {
            0.0
        }
    }
}

/// Fraction of `element` area that lies within `viewport` grown by `margin`
pub fn intersection_ratio(element: Rect, viewport: &Rect, margin: &RootMargin) -> Option<f64> {
    if element.is_empty() {
        return None;
    }
    let root = viewport.expand(margin);
    let visible = element
        .intersection(&root)
        .map(|overlap| overlap.area())
        .unwrap_or(0.0);
    Some((visible / element.area()).clamp(0.0, 1.0))
}
