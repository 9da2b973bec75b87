//! Terminal host surface
//!
//! The engine writes target styles with a transition; the terminal cannot
//! animate by itself, so every write starts a [`StyleTransition`] that the
//! renderer samples once per frame.

use std::collections::HashMap;

use averbuch_core::motion::{
    Clock, ElementId, Rect, Style, StyleTransition, Surface, Transition,
};
use averbuch_core::site::Page;

#[derive(Debug, Clone)]
struct Node {
    bounds: Rect,
    parent: Option<ElementId>,
    target: Style,
    running: Option<StyleTransition>,
}

impl Node {
    fn sample(&self, now: std::time::Duration) -> Style {
        match &self.running {
            Some(running) => self.target.merge(&running.sample(now)),
            None => self.target,
        }
    }
}

/// Resolved presentation of one block, parents included
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub opacity: f64,
    /// Horizontal offset in pixels
    pub dx: f64,
    /// Vertical offset in pixels
    pub dy: f64,
    /// Horizontal scale, 1.0 at rest
    pub scale_x: f64,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            dx: 0.0,
            dy: 0.0,
            scale_x: 1.0,
        }
    }
}

/// [`Surface`] backed by a laid-out [`Page`]
pub struct TerminalSurface<C: Clock> {
    clock: C,
    nodes: HashMap<ElementId, Node>,
}

impl<C: Clock> TerminalSurface<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            nodes: HashMap::new(),
        }
    }

    /// Attach every block of `page`, dropping anything from a previous layout
    pub fn load(&mut self, page: &Page) {
        self.nodes.clear();
        for block in page.blocks() {
            self.nodes.insert(
                block.id,
                Node {
                    bounds: block.bounds,
                    parent: block.parent,
                    target: Style::default(),
                    running: None,
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Style of one element as it should be drawn now
    pub fn style(&self, id: ElementId) -> Option<Style> {
        let now = self.clock.now();
        self.nodes.get(&id).map(|node| node.sample(now))
    }

    /// Style of `id` with every ancestor's style folded in.
    ///
    /// Opacities and scales multiply, offsets add. Percent offsets are relative to
    /// the height (or width) of the element that carries them.
    pub fn presentation(&self, id: ElementId) -> Presentation {
        let now = self.clock.now();
        let mut out = Presentation::default();
        let mut next = Some(id);
        // Parent chains are short; the bound guards against a malformed cycle
        let mut depth = 0;
        while let Some(current) = next {
            let Some(node) = self.nodes.get(&current) else {
                break;
            };
            let style = node.sample(now);
            if let Some(opacity) = style.opacity {
                out.opacity *= opacity.clamp(0.0, 1.0);
            }
            if let Some(x) = style.translate_x {
                out.dx += x.to_px(node.bounds.width);
            }
            if let Some(y) = style.translate_y {
                out.dy += y.to_px(node.bounds.height);
            }
            if let Some(scale) = style.scale_x {
                out.scale_x *= scale.max(0.0);
            }
            next = node.parent;
            depth += 1;
            if depth > 16 {
                break;
            }
        }
        out
    }

    /// Whether any transition is still playing
    pub fn is_animating(&self) -> bool {
        let now = self.clock.now();
        self.nodes
            .values()
            .filter_map(|node| node.running.as_ref())
            .any(|running| !running.is_finished(now))
    }

    /// Drop finished transitions
    pub fn settle(&mut self) {
        let now = self.clock.now();
        for node in self.nodes.values_mut() {
            if node.running.as_ref().is_some_and(|r| r.is_finished(now)) {
                node.running = None;
            }
        }
    }
}

impl<C: Clock> Surface for TerminalSurface<C> {
    fn geometry(&self, id: ElementId) -> Option<Rect> {
        self.nodes.get(&id).map(|node| node.bounds)
    }

    fn apply(&mut self, id: ElementId, style: &Style, transition: &Transition) -> bool {
        let now = self.clock.now();
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let current = node.sample(now);
        let target = node.target.merge(style);
        node.running = if transition.is_instant() {
            None
        } else {
            Some(StyleTransition::new(current, target, *transition, now))
        };
        node.target = target;
        true
    }
}
