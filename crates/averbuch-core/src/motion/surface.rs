//! Host boundary: the presentation surface the engine writes to
//!
//! The engine never owns elements. It asks the host for geometry and hands
//! finished styles back; a host that no longer knows an element reports it as
//! detached and the engine quietly stops touching it.

use std::collections::HashMap;
use std::fmt;

use super::geometry::Rect;
use super::style::{Style, Transition};

/// Host-assigned element identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Presentation surface implemented by a host (terminal, headless recorder)
pub trait Surface {
    /// Document-space bounds, or `None` if the element is detached
    fn geometry(&self, id: ElementId) -> Option<Rect>;

    /// Apply all properties in `style` at once.
    ///
    /// Returns `false` if the element is detached; nothing is written then.
    fn apply(&mut self, id: ElementId, style: &Style, transition: &Transition) -> bool;
}

/// State the [`MemorySurface`] keeps per element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    pub bounds: Rect,
    pub style: Style,
    pub transition: Transition,
    /// Number of `apply` calls that reached this element
    pub writes: usize,
}

/// In-memory surface used for headless simulation and tests
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: HashMap<ElementId, ElementState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach (or move) an element
    pub fn attach(&mut self, id: ElementId, bounds: Rect) {
        self.elements
            .entry(id)
            .and_modify(|state| state.bounds = bounds)
            .or_insert(ElementState {
                bounds,
                style: Style::default(),
                transition: Transition::INSTANT,
                writes: 0,
            });
    }

    /// Remove an element, as if it were taken out of the page
    pub fn detach(&mut self, id: ElementId) -> Option<ElementState> {
        self.elements.remove(&id)
    }

    pub fn state(&self, id: ElementId) -> Option<&ElementState> {
        self.elements.get(&id)
    }

    pub fn style(&self, id: ElementId) -> Option<Style> {
        self.elements.get(&id).map(|state| state.style)
    }

    pub fn writes(&self, id: ElementId) -> usize {
        self.elements.get(&id).map(|state| state.writes).unwrap_or(0)
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys().copied()
    }
}

impl Surface for MemorySurface {
    fn geometry(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(&id).map(|state| state.bounds)
    }

    fn apply(&mut self, id: ElementId, style: &Style, transition: &Transition) -> bool {
        match self.elements.get_mut(&id) {
            Some(state) => {
                state.style = state.style.merge(style);
                state.transition = *transition;
                state.writes += 1;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_to_detached_is_rejected() {
        let mut surface = MemorySurface::new();
        let id = ElementId(1);
        assert!(!surface.apply(id, &Style::opacity(1.0), &Transition::INSTANT));

        surface.attach(id, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(surface.apply(id, &Style::opacity(1.0), &Transition::INSTANT));
        assert_eq!(surface.writes(id), 1);

        surface.detach(id);
        assert_eq!(surface.geometry(id), None);
        assert!(!surface.apply(id, &Style::opacity(0.0), &Transition::INSTANT));
    }
}
