//! L3 Molecular Layer: One-shot reveal on visibility
//!
//! ```text
//! NotYetRevealed --(visible fraction >= threshold)--> Revealed (terminal)
//! ```
//!
//! Registering an element applies its hidden style immediately. The first
//! qualifying intersection report applies the shown style with the declared
//! transition, after which the element is no longer observed.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

use super::easing::EasingCurve;
use super::geometry::{Rect, RootMargin};
use super::preferences::MotionPreferences;
use super::progress::IntersectionSource;
use super::style::{Style, Transition};
use super::surface::{ElementId, Surface};

new_key_type! {
    /// Handle to a registered reveal
    pub struct RevealId;
}

/// Per-element visibility lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityState {
    NotYetRevealed,
    Revealed,
}

/// How and when an element is revealed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    pub threshold: f64,
    pub margin: RootMargin,
    pub hidden: Style,
    pub shown: Style,
    pub transition: Transition,
    /// Element whose visibility triggers the reveal, when not the revealed
    /// element itself (children staggered off their section)
    pub observe: Option<ElementId>,
}

impl RevealOptions {
    /// Fade up from 30px below over 800ms, the site-wide default
    pub fn new(threshold: f64, margin: RootMargin) -> Self {
        Self {
            threshold,
            margin,
            hidden: Style::hidden(30.0),
            shown: Style::SHOWN,
            transition: Transition::new(Duration::from_millis(800), EasingCurve::EaseOut),
            observe: None,
        }
    }

    /// Fade only, no offset
    pub fn fade(mut self) -> Self {
        self.hidden = Style::opacity(0.0);
        self.shown = Style::opacity(1.0);
        self
    }

    /// Start `px` pixels below the resting position
    pub fn offset(mut self, px: f64) -> Self {
        self.hidden = Style::hidden(px);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.transition.duration = duration;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.transition.delay = delay;
        self
    }

    pub fn curve(mut self, curve: EasingCurve) -> Self {
        self.transition.curve = curve;
        self
    }

    /// Start and end styles other than the fade-up default
    pub fn styles(mut self, hidden: Style, shown: Style) -> Self {
        self.hidden = hidden;
        self.shown = shown;
        self
    }

    /// Trigger on `element` entering view instead of the revealed element
    pub fn observing(mut self, element: ElementId) -> Self {
        self.observe = Some(element);
        self
    }
}

/// Reveal state machine for a single element
#[derive(Debug, Clone)]
pub struct RevealTrigger {
    element: ElementId,
    source: IntersectionSource,
    options: RevealOptions,
    state: VisibilityState,
}

impl RevealTrigger {
    pub fn new(element: ElementId, options: RevealOptions) -> Self {
        Self {
            element,
            source: IntersectionSource::new(options.threshold, options.margin),
            options,
            state: VisibilityState::NotYetRevealed,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    /// Feed an intersection ratio.
    ///
    /// Returns `Some(true)` on the one transition to `Revealed`, `Some(false)`
    /// when nothing changes, and `None` if the element turned out to be
    /// detached.
    pub fn notify(&mut self, ratio: f64, surface: &mut dyn Surface, prefs: &MotionPreferences) -> Option<bool> {
        if self.state == VisibilityState::Revealed || !self.source.is_entered(ratio) {
            return Some(false);
        }

        let transition = prefs.transition(self.options.transition);
        if !surface.apply(self.element, &self.options.shown, &transition) {
            return None;
        }

        debug!(element = %self.element, ratio, "Element revealed");
        self.state = VisibilityState::Revealed;
        Some(true)
    }

    /// Ratio from current geometry, for hosts without intersection callbacks
    pub fn measure(&self, surface: &dyn Surface, viewport: &Rect) -> Option<f64> {
        let observed = self.options.observe.unwrap_or(self.element);
        self.source.ratio(surface.geometry(observed), viewport)
    }
}

/// All reveal triggers on a page
#[derive(Debug)]
pub struct RevealObserver {
    triggers: SlotMap<RevealId, RevealTrigger>,
    prefs: MotionPreferences,
}

impl RevealObserver {
    pub fn new(prefs: MotionPreferences) -> Self {
        Self {
            triggers: SlotMap::with_key(),
            prefs,
        }
    }

    /// Start observing `element`; its hidden style is applied right away
    pub fn register(&mut self, element: ElementId, options: RevealOptions, surface: &mut dyn Surface) -> RevealId {
        surface.apply(element, &options.hidden, &Transition::INSTANT);
        self.triggers.insert(RevealTrigger::new(element, options))
    }

    /// Stop observing. Unknown or already revealed handles are a no-op.
    pub fn unregister(&mut self, id: RevealId) {
        self.triggers.remove(id);
    }

    pub fn state(&self, id: RevealId) -> Option<VisibilityState> {
        self.triggers.get(id).map(|t| t.state())
    }

    /// Whether the handle is still waiting for its reveal
    pub fn is_observing(&self, id: RevealId) -> bool {
        self.state(id) == Some(VisibilityState::NotYetRevealed)
    }

    /// Number of elements still waiting
    pub fn pending(&self) -> usize {
        self.triggers
            .values()
            .filter(|t| t.state() == VisibilityState::NotYetRevealed)
            .count()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Deliver an intersection notification for one element
    pub fn notify(&mut self, id: RevealId, ratio: f64, surface: &mut dyn Surface) -> bool {
        let Some(trigger) = self.triggers.get_mut(id) else {
            trace!("Intersection notification for unknown reveal ignored");
            return false;
        };
        match trigger.notify(ratio, surface, &self.prefs) {
            Some(revealed) => revealed,
            None => {
                debug!(element = %trigger.element(), "Observed element detached, dropping reveal");
                self.triggers.remove(id);
                false
            }
        }
    }

    /// Measure every pending element against `viewport` and reveal those that
    /// qualify. Returns the handles revealed by this call.
    pub fn check(&mut self, viewport: &Rect, surface: &mut dyn Surface) -> Vec<RevealId> {
        let view: &dyn Surface = &*surface;
        let ratios: Vec<(RevealId, Option<f64>)> = self
            .triggers
            .iter()
            .filter(|(_, t)| t.state() == VisibilityState::NotYetRevealed)
            .map(|(id, t)| (id, t.measure(view, viewport)))
            .collect();

        let mut revealed = Vec::new();
        for (id, ratio) in ratios {
            // Unmeasurable elements are skipped until they can be measured
            let Some(ratio) = ratio else { continue };
            if self.notify(id, ratio, surface) {
                revealed.push(id);
            }
        }
        revealed
    }

    pub fn clear(&mut self) {
        self.triggers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::surface::MemorySurface;

    fn setup() -> (RevealObserver, MemorySurface, ElementId) {
        let mut surface = MemorySurface::new();
        let id = ElementId(1);
        surface.attach(id, Rect::new(0.0, 1200.0, 1000.0, 400.0));
        (RevealObserver::new(MotionPreferences::default()), surface, id)
    }

    #[test]
    fn test_register_applies_hidden_style() {
        let (mut observer, mut surface, id) = setup();
        let options = RevealOptions::new(0.1, RootMargin::uniform(-100.0));
        let handle = observer.register(id, options, &mut surface);

        assert_eq!(observer.state(handle), Some(VisibilityState::NotYetRevealed));
        assert_eq!(surface.style(id).unwrap().opacity, Some(0.0));
    }

    #[test]
    fn test_threshold_crossing_reveals_exactly_once() {
        let (mut observer, mut surface, id) = setup();
        let margin: RootMargin = "-100px".parse().unwrap();
        let handle = observer.register(id, RevealOptions::new(0.1, margin), &mut surface);
        let writes_after_register = surface.writes(id);

        assert!(!observer.notify(handle, 0.05, &mut surface));
        assert_eq!(observer.state(handle), Some(VisibilityState::NotYetRevealed));

        assert!(observer.notify(handle, 0.2, &mut surface));
        assert_eq!(observer.state(handle), Some(VisibilityState::Revealed));
        assert_eq!(surface.writes(id), writes_after_register + 1);

        // Further reports are ignored and never re-apply
        for ratio in [0.0, 0.5, 1.0] {
            assert!(!observer.notify(handle, ratio, &mut surface));
        }
        assert_eq!(observer.state(handle), Some(VisibilityState::Revealed));
        assert_eq!(surface.writes(id), writes_after_register + 1);

        let style = surface.style(id).unwrap();
        assert_eq!(style.opacity, Some(1.0));
        assert!(!observer.is_observing(handle));
    }

    #[test]
    fn test_unregister_after_reveal_is_noop() {
        let (mut observer, mut surface, id) = setup();
        let handle = observer.register(id, RevealOptions::new(0.1, RootMargin::ZERO), &mut surface);
        observer.notify(handle, 1.0, &mut surface);
        observer.unregister(handle);
        observer.unregister(handle);
        assert_eq!(observer.state(handle), None);
    }

    #[test]
    fn test_reduced_motion_uses_instant_transition() {
        let mut surface = MemorySurface::new();
        let id = ElementId(5);
        surface.attach(id, Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut observer = RevealObserver::new(MotionPreferences::new(true));
        let options = RevealOptions::new(0.0, RootMargin::ZERO).delay(Duration::from_millis(450));
        let handle = observer.register(id, options, &mut surface);

        assert!(observer.notify(handle, 0.5, &mut surface));
        assert!(surface.state(id).unwrap().transition.is_instant());
    }

    #[test]
    fn test_check_uses_margin_adjusted_viewport() {
        let (mut observer, mut surface, id) = setup();
        let options = RevealOptions::new(0.1, "0px 0px -100px 0px".parse().unwrap());
        let handle = observer.register(id, options, &mut surface);

        // Element top at 1200; viewport bottom at 1250 minus 100px margin
        let viewport = Rect::new(0.0, 450.0, 1000.0, 800.0);
        assert!(observer.check(&viewport, &mut surface).is_empty());

        // Bottom edge effectively at 1300: 100 of 400 rows visible = 0.25
        let viewport = Rect::new(0.0, 600.0, 1000.0, 800.0);
        assert_eq!(observer.check(&viewport, &mut surface), vec![handle]);
        assert_eq!(observer.pending(), 0);
    }

    #[test]
    fn test_child_reveals_when_observed_section_enters() {
        let (mut observer, mut surface, section) = setup();
        let title = ElementId(2);
        surface.attach(title, Rect::new(0.0, 1250.0, 1000.0, 16.0));
        let options = RevealOptions::new(0.0, RootMargin::ZERO)
            .offset(20.0)
            .delay(Duration::from_millis(100))
            .observing(section);
        let handle = observer.register(title, options, &mut surface);
        assert_eq!(surface.style(title).unwrap().opacity, Some(0.0));

        // The title itself is in view here, the section top is not
        let viewport = Rect::new(0.0, 1260.0, 1000.0, 800.0);
        surface.attach(section, Rect::new(0.0, 2100.0, 1000.0, 400.0));
        assert!(observer.check(&viewport, &mut surface).is_empty());

        surface.attach(section, Rect::new(0.0, 1200.0, 1000.0, 400.0));
        assert_eq!(observer.check(&viewport, &mut surface), vec![handle]);
        let state = surface.state(title).unwrap();
        assert_eq!(state.style.opacity, Some(1.0));
        assert_eq!(state.transition.delay, Duration::from_millis(100));
    }

    #[test]
    fn test_detached_element_is_dropped_silently() {
        let (mut observer, mut surface, id) = setup();
        let handle = observer.register(id, RevealOptions::new(0.1, RootMargin::ZERO), &mut surface);
        surface.detach(id);

        assert!(!observer.notify(handle, 1.0, &mut surface));
        assert_eq!(observer.state(handle), None);
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        assert!(observer.check(&viewport, &mut surface).is_empty());
    }
}
