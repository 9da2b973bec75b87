//! L3 Molecular Layer: Scroll-driven property bindings
//!
//! A [`PropertyBinding`] ties an element's opacity and offsets to mappings that
//! all read the same progress value. Each update computes the whole style first
//! and hands it to the surface in a single call.

use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use super::mapping::Mapping;
use super::progress::ScrollSource;
use super::style::{Style, Transition};
use super::surface::{ElementId, Surface};

new_key_type! {
    /// Handle to a registered binding
    pub struct BindingId;
}

/// Outcome of a single binding update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingUpdate {
    /// Style written to the surface
    Applied,
    /// Computed style equals the last one written
    Unchanged,
    /// Progress target could not be measured this time
    Suspended,
    /// Styled element is gone; the binding will never write again
    Inert,
}

/// Opacity / offset mappings for one element
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    element: ElementId,
    target: ElementId,
    source: ScrollSource,
    opacity: Option<Mapping>,
    translate_x: Option<Mapping>,
    translate_y: Option<Mapping>,
    inert: bool,
    last: Option<Style>,
}

impl PropertyBinding {
    /// Bind `element`, measuring progress against the element itself
    pub fn new(element: ElementId, source: ScrollSource) -> Self {
        Self {
            element,
            target: element,
            source,
            opacity: None,
            translate_x: None,
            translate_y: None,
            inert: false,
            last: None,
        }
    }

    /// Measure progress against another element (e.g. the enclosing section)
    pub fn tracking(mut self, target: ElementId) -> Self {
        self.target = target;
        self
    }

    pub fn opacity(mut self, mapping: Mapping) -> Self {
        self.opacity = Some(mapping);
        self
    }

    pub fn translate_x(mut self, mapping: Mapping) -> Self {
        self.translate_x = Some(mapping);
        self
    }

    pub fn translate_y(mut self, mapping: Mapping) -> Self {
        self.translate_y = Some(mapping);
        self
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Style for a given progress value; pure
    pub fn evaluate(&self, progress: f64) -> Style {
        Style {
            opacity: self.opacity.as_ref().map(|m| m.map(progress).clamp(0.0, 1.0)),
            translate_x: self.translate_x.as_ref().map(|m| m.map_measure(progress)),
            translate_y: self.translate_y.as_ref().map(|m| m.map_measure(progress)),
            scale_x: None,
        }
    }

    /// Current progress, or `None` if the target is unmeasurable
    pub fn progress(&self, scroll: f64, viewport_height: f64, surface: &dyn Surface) -> Option<f64> {
        self.source
            .progress(scroll, surface.geometry(self.target), viewport_height)
    }

    /// Recompute and apply
    pub fn update(&mut self, scroll: f64, viewport_height: f64, surface: &mut dyn Surface) -> BindingUpdate {
        if self.inert {
            return BindingUpdate::Inert;
        }

        let Some(progress) = self.progress(scroll, viewport_height, surface) else {
            if surface.geometry(self.element).is_none() {
                self.go_inert();
                return BindingUpdate::Inert;
            }
            return BindingUpdate::Suspended;
        };

        let style = self.evaluate(progress);
        if self.last == Some(style) {
            return BindingUpdate::Unchanged;
        }

        if surface.apply(self.element, &style, &Transition::INSTANT) {
            self.last = Some(style);
            BindingUpdate::Applied
        } else {
            self.go_inert();
            BindingUpdate::Inert
        }
    }

    fn go_inert(&mut self) {
        debug!(element = %self.element, "Bound element detached, binding is now inert");
        self.inert = true;
    }
}

/// Registry of all scroll bindings on a page
#[derive(Debug, Default)]
pub struct BindingSet {
    bindings: SlotMap<BindingId, PropertyBinding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, binding: PropertyBinding) -> BindingId {
        self.bindings.insert(binding)
    }

    /// Remove a binding; unknown handles are ignored
    pub fn unregister(&mut self, id: BindingId) -> Option<PropertyBinding> {
        self.bindings.remove(id)
    }

    pub fn get(&self, id: BindingId) -> Option<&PropertyBinding> {
        self.bindings.get(id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Update every binding; returns how many wrote to the surface
    pub fn update_all(&mut self, scroll: f64, viewport_height: f64, surface: &mut dyn Surface) -> usize {
        let mut applied = 0;
        for binding in self.bindings.values_mut() {
            if binding.update(scroll, viewport_height, surface) == BindingUpdate::Applied {
                applied += 1;
            }
        }
        applied
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::easing::EasingCurve;
    use crate::motion::geometry::Rect;
    use crate::motion::mapping::Measure;
    use crate::motion::progress::ScrollRange;
    use crate::motion::surface::MemorySurface;

    fn parallax(element: ElementId) -> PropertyBinding {
        PropertyBinding::new(element, ScrollSource::new(ScrollRange::traversal()))
            .translate_y(
                Mapping::measures(&[0.0, 1.0], &["-25%", "25%"])
                    .unwrap()
                    .with_curve(EasingCurve::Smoothstep),
            )
            .opacity(
                Mapping::numeric(&[0.0, 0.3, 0.7, 1.0], &[0.0, 1.0, 1.0, 0.0])
                    .unwrap()
                    .with_curve(EasingCurve::Smoothstep),
            )
    }

    #[test]
    fn test_all_properties_applied_together() {
        let id = ElementId(7);
        let mut surface = MemorySurface::new();
        // 200 tall at y=1000 in a 800 tall viewport: range is 200..1200
        surface.attach(id, Rect::new(0.0, 1000.0, 100.0, 200.0));
        let mut binding = parallax(id);

        assert_eq!(binding.update(700.0, 800.0, &mut surface), BindingUpdate::Applied);
        let style = surface.style(id).unwrap();
        assert_eq!(style.opacity, Some(1.0));
        assert_eq!(style.translate_y, Some(Measure::percent(0.0)));
        assert_eq!(surface.writes(id), 1);
    }

    #[test]
    fn test_unchanged_style_is_not_rewritten() {
        let id = ElementId(1);
        let mut surface = MemorySurface::new();
        surface.attach(id, Rect::new(0.0, 1000.0, 100.0, 200.0));
        let mut binding = parallax(id);

        binding.update(0.0, 800.0, &mut surface);
        assert_eq!(binding.update(50.0, 800.0, &mut surface), BindingUpdate::Unchanged);
        assert_eq!(surface.writes(id), 1);
    }

    #[test]
    fn test_detached_element_goes_inert() {
        let id = ElementId(3);
        let mut surface = MemorySurface::new();
        surface.attach(id, Rect::new(0.0, 0.0, 100.0, 800.0));
        let mut binding = parallax(id);
        binding.update(100.0, 800.0, &mut surface);

        surface.detach(id);
        assert_eq!(binding.update(200.0, 800.0, &mut surface), BindingUpdate::Inert);

        // Re-attaching does not revive it
        surface.attach(id, Rect::new(0.0, 0.0, 100.0, 800.0));
        assert_eq!(binding.update(300.0, 800.0, &mut surface), BindingUpdate::Inert);
        assert!(binding.is_inert());
    }

    #[test]
    fn test_missing_target_suspends() {
        let section = ElementId(1);
        let content = ElementId(2);
        let mut surface = MemorySurface::new();
        surface.attach(content, Rect::new(0.0, 100.0, 100.0, 100.0));

        let mut binding = PropertyBinding::new(content, ScrollSource::new(ScrollRange::exit()))
            .tracking(section)
            .opacity(Mapping::numeric(&[0.0, 0.5], &[1.0, 0.0]).unwrap());

        assert_eq!(binding.update(10.0, 800.0, &mut surface), BindingUpdate::Suspended);
        assert!(!binding.is_inert());

        surface.attach(section, Rect::new(0.0, 0.0, 100.0, 800.0));
        assert_eq!(binding.update(200.0, 800.0, &mut surface), BindingUpdate::Applied);
        // progress 0.25 on a [0, 0.5] linear fade
        assert_eq!(surface.style(content).unwrap().opacity, Some(0.5));
    }

    #[test]
    fn test_binding_set_update_all() {
        let mut surface = MemorySurface::new();
        let mut set = BindingSet::new();
        for i in 0..3 {
            let id = ElementId(i);
            surface.attach(id, Rect::new(0.0, 1000.0 * i as f64, 100.0, 400.0));
            set.register(parallax(id));
        }
        assert_eq!(set.update_all(900.0, 800.0, &mut surface), 3);
        assert_eq!(set.update_all(900.0, 800.0, &mut surface), 0);

        let id = set.register(parallax(ElementId(99)));
        assert_eq!(set.len(), 4);
        assert!(set.unregister(id).is_some());
        assert!(set.unregister(id).is_none());
    }
}
