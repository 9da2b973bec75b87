//! L2 Organism Layer: Motion engine
//!
//! Owns every binding, reveal and the pointer follower for one page and routes
//! raw host events to them:
//!
//! ```text
//! Scroll / Resize ──► FrameScheduler ──► BindingSet + RevealObserver  (1 per frame)
//! Intersection ──────────────────────► RevealObserver               (immediately)
//! PointerMove / Enter / Leave ───────► PointerFollower              (target / hover only)
//! frame() ───────────────────────────► scheduled update + follower tick
//! ```
//!
//! Every registration returns a handle and is recorded so [`MotionEngine::teardown`]
//! can release it. A torn-down engine ignores all further events and frames.

use tracing::{debug, info, trace};

use super::binding::{BindingId, BindingSet, PropertyBinding};
use super::follower::{PointerFollower, DEFAULT_SMOOTHING};
use super::frame::{FrameScheduler, FrameTicker};
use super::geometry::{Point, Rect};
use super::mapping::Measure;
use super::preferences::MotionPreferences;
use super::reveal::{RevealId, RevealObserver, RevealOptions, VisibilityState};
use super::style::{Style, Transition};
use super::surface::{ElementId, Surface};
use super::timing::Clock;
use crate::config::AppConfig;

/// Raw input from the host environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionEvent {
    Scroll { offset: f64 },
    Resize { width: f64, height: f64 },
    PointerMove { x: f64, y: f64 },
    PointerEnter(ElementId),
    PointerLeave(ElementId),
    /// Host-delivered visible fraction for a reveal
    Intersection { reveal: RevealId, ratio: f64 },
}

/// Current viewport in document space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll: 0.0,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, self.scroll, self.width, self.height)
    }
}

/// Anything registered with the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Binding(BindingId),
    Reveal(RevealId),
    Interactive(ElementId),
    Follower(ElementId),
}

/// Engine tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    pub fps: u32,
    pub follower_enabled: bool,
    pub smoothing: f64,
    /// Follower only runs on viewports at least this wide
    pub min_follower_width: f64,
    /// Measure pending reveals from geometry on every scheduled update.
    /// Disable when the host delivers [`MotionEvent::Intersection`] itself.
    pub measure_reveals: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            follower_enabled: true,
            smoothing: DEFAULT_SMOOTHING,
            min_follower_width: 0.0,
            measure_reveals: true,
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fps: config.motion.animation_fps,
            follower_enabled: config.follower.enabled,
            smoothing: config.follower.smoothing,
            min_follower_width: config.follower.min_viewport_width as f64,
            measure_reveals: true,
        }
    }
}

/// What one frame did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Whether the scheduled scroll/resize update ran this frame
    pub updated: bool,
    pub bindings_applied: usize,
    pub revealed: Vec<RevealId>,
    pub follower: Option<Point>,
}

/// State the scheduled update reads and writes
#[derive(Debug)]
struct Scene {
    viewport: Viewport,
    bindings: BindingSet,
    reveals: RevealObserver,
    measure_reveals: bool,
}

type FrameTask = fn(&mut Scene, &mut dyn Surface, &mut FrameReport);

fn recompute(scene: &mut Scene, surface: &mut dyn Surface, report: &mut FrameReport) {
    let viewport = scene.viewport;
    report.bindings_applied = scene.bindings.update_all(viewport.scroll, viewport.height, surface);
    if scene.measure_reveals {
        report.revealed = scene.reveals.check(&viewport.rect(), surface);
    }
}

/// Scroll-driven motion for one page
pub struct MotionEngine<C: Clock> {
    scene: Scene,
    scheduler: FrameScheduler<FrameTask>,
    ticker: FrameTicker<C>,
    follower: PointerFollower,
    follower_element: Option<ElementId>,
    options: EngineOptions,
    prefs: MotionPreferences,
    registrations: Vec<Registration>,
    torn_down: bool,
}

impl<C: Clock> MotionEngine<C> {
    pub fn new(clock: C, prefs: MotionPreferences, options: EngineOptions) -> Self {
        Self {
            scene: Scene {
                viewport: Viewport::default(),
                bindings: BindingSet::new(),
                reveals: RevealObserver::new(prefs),
                measure_reveals: options.measure_reveals,
            },
            scheduler: FrameScheduler::new(),
            ticker: FrameTicker::new(clock, options.fps),
            follower: PointerFollower::new(options.smoothing),
            follower_element: None,
            options,
            prefs,
            registrations: Vec::new(),
            torn_down: false,
        }
    }

    pub fn prefs(&self) -> MotionPreferences {
        self.prefs
    }

    pub fn viewport(&self) -> Viewport {
        self.scene.viewport
    }

    pub fn clock(&self) -> &C {
        self.ticker.clock()
    }

    pub fn follower(&self) -> &PointerFollower {
        &self.follower
    }

    /// Whether the follower runs at the current viewport width
    pub fn follower_active(&self) -> bool {
        self.options.follower_enabled
            && self.follower_element.is_some()
            && self.scene.viewport.width >= self.options.min_follower_width
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn has_pending_update(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Live registrations, in registration order
    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn reveal_state(&self, id: RevealId) -> Option<VisibilityState> {
        self.scene.reveals.state(id)
    }

    pub fn binding_count(&self) -> usize {
        self.scene.bindings.len()
    }

    /// Reveals still waiting for their element to become visible
    pub fn pending_reveals(&self) -> usize {
        self.scene.reveals.pending()
    }

    /// Replace the whole viewport (initial layout) and schedule a recompute
    /// for the next frame
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.scene.viewport = viewport;
        self.schedule();
    }

    pub fn bind(&mut self, binding: PropertyBinding) -> Option<BindingId> {
        if self.torn_down {
            return None;
        }
        let id = self.scene.bindings.register(binding);
        self.registrations.push(Registration::Binding(id));
        self.schedule();
        Some(id)
    }

    pub fn reveal(
        &mut self,
        element: ElementId,
        options: RevealOptions,
        surface: &mut dyn Surface,
    ) -> Option<RevealId> {
        if self.torn_down {
            return None;
        }
        let id = self.scene.reveals.register(element, options, surface);
        self.registrations.push(Registration::Reveal(id));
        self.schedule();
        Some(id)
    }

    /// Element whose hover swaps the follower style
    pub fn register_interactive(&mut self, element: ElementId) -> Option<Registration> {
        if self.torn_down {
            return None;
        }
        self.follower.register_interactive(element);
        let registration = Registration::Interactive(element);
        self.registrations.push(registration);
        Some(registration)
    }

    /// Element positioned by the pointer follower every frame
    pub fn follow_pointer(&mut self, element: ElementId) -> Option<Registration> {
        if self.torn_down {
            return None;
        }
        self.follower_element = Some(element);
        let registration = Registration::Follower(element);
        self.registrations.push(registration);
        Some(registration)
    }

    /// Release one registration; unknown or already released handles are ignored
    pub fn unregister(&mut self, registration: Registration) {
        self.registrations.retain(|r| *r != registration);
        self.release(registration);
    }

    fn release(&mut self, registration: Registration) {
        match registration {
            Registration::Binding(id) => {
                self.scene.bindings.unregister(id);
            }
            Registration::Reveal(id) => self.scene.reveals.unregister(id),
            Registration::Interactive(element) => self.follower.unregister_interactive(element),
            Registration::Follower(element) => {
                if self.follower_element == Some(element) {
                    self.follower_element = None;
                }
            }
        }
    }

    fn schedule(&mut self) -> bool {
        self.scheduler.request_update(recompute as FrameTask)
    }

    /// Route a host event
    pub fn handle(&mut self, event: MotionEvent, surface: &mut dyn Surface) {
        if self.torn_down {
            return;
        }
        match event {
            MotionEvent::Scroll { offset } => {
                self.scene.viewport.scroll = offset;
                if !self.schedule() {
                    trace!(offset, "Scroll coalesced into pending frame");
                }
            }
            MotionEvent::Resize { width, height } => {
                self.scene.viewport.width = width;
                self.scene.viewport.height = height;
                self.schedule();
            }
            MotionEvent::PointerMove { x, y } => self.follower.pointer_moved(x, y),
            MotionEvent::PointerEnter(element) => self.follower.pointer_enter(element),
            MotionEvent::PointerLeave(element) => self.follower.pointer_leave(element),
            MotionEvent::Intersection { reveal, ratio } => {
                self.scene.reveals.notify(reveal, ratio, surface);
            }
        }
    }

    /// Run one display refresh: the scheduled update (if any) and a follower step
    pub fn frame(&mut self, surface: &mut dyn Surface) -> FrameReport {
        let mut report = FrameReport::default();
        if self.torn_down {
            return report;
        }

        if let Some(task) = self.scheduler.take() {
            task(&mut self.scene, surface, &mut report);
            report.updated = true;
        }

        if self.follower_active() {
            let position = self.follower.tick();
            if let Some(element) = self.follower_element {
                let style = Style::default()
                    .with_translate_x(Measure::px(position.x))
                    .with_translate_y(Measure::px(position.y));
                if !surface.apply(element, &style, &Transition::INSTANT) {
                    debug!(%element, "Follower element detached");
                    self.follower_element = None;
                }
            }
            report.follower = Some(position);
        }

        report
    }

    /// Run a frame if the clock says one is due
    pub fn tick(&mut self, surface: &mut dyn Surface) -> Option<FrameReport> {
        if self.torn_down || !self.ticker.poll() {
            return None;
        }
        Some(self.frame(surface))
    }

    /// Release every registration and stop the frame loop; permanent
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let registrations = std::mem::take(&mut self.registrations);
        let count = registrations.len();
        for registration in registrations {
            self.release(registration);
        }
        self.scene.bindings.clear();
        self.scene.reveals.clear();
        self.follower.clear_interactive();
        self.scheduler.cancel();
        self.ticker.stop();
        self.torn_down = true;
        info!(released = count, "Motion engine torn down");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::motion::geometry::RootMargin;
    use crate::motion::mapping::Mapping;
    use crate::motion::progress::{Anchor, Edge, ScrollRange, ScrollSource};
    use crate::motion::surface::MemorySurface;
    use crate::motion::timing::ManualClock;

    fn engine() -> (MotionEngine<ManualClock>, ManualClock, MemorySurface) {
        let clock = ManualClock::new();
        let mut engine = MotionEngine::new(clock.clone(), MotionPreferences::default(), EngineOptions::default());
        engine.set_viewport(Viewport::new(1200.0, 800.0));
        (engine, clock, MemorySurface::new())
    }

    /// Element whose range maps scroll 0..1000 exactly
    fn tall_element(surface: &mut MemorySurface) -> ElementId {
        let id = ElementId(1);
        surface.attach(id, Rect::new(0.0, 0.0, 1200.0, 1000.0));
        id
    }

    fn document_range() -> ScrollRange {
        ScrollRange::new(
            Edge::new(Anchor::Start, Anchor::Start),
            Edge::new(Anchor::End, Anchor::Start),
        )
        .unwrap()
    }

    #[test]
    fn test_scroll_to_percent_offset_end_to_end() {
        let (mut engine, _clock, mut surface) = engine();
        let id = tall_element(&mut surface);
        let binding = PropertyBinding::new(id, ScrollSource::new(document_range()))
            .translate_y(Mapping::measures(&[0.0, 1.0], &["0%", "30%"]).unwrap());
        engine.bind(binding);

        engine.handle(MotionEvent::Scroll { offset: 500.0 }, &mut surface);
        let report = engine.frame(&mut surface);

        assert!(report.updated);
        assert_eq!(report.bindings_applied, 1);
        let offset = surface.style(id).unwrap().translate_y.unwrap();
        assert_eq!(offset.to_string(), "15%");
    }

    #[test]
    fn test_scroll_bursts_coalesce_per_frame() {
        let (mut engine, _clock, mut surface) = engine();
        let id = tall_element(&mut surface);
        engine.bind(
            PropertyBinding::new(id, ScrollSource::new(document_range()))
                .opacity(Mapping::numeric(&[0.0, 1.0], &[1.0, 0.0]).unwrap()),
        );
        engine.frame(&mut surface);
        let writes = surface.writes(id);

        for offset in [10.0, 20.0, 30.0, 40.0, 250.0] {
            engine.handle(MotionEvent::Scroll { offset }, &mut surface);
        }
        let report = engine.frame(&mut surface);
        assert!(report.updated);
        assert_eq!(surface.writes(id), writes + 1);
        // The one update saw the latest scroll offset
        assert_eq!(surface.style(id).unwrap().opacity, Some(0.75));

        assert!(!engine.frame(&mut surface).updated);
    }

    #[test]
    fn test_reveal_measured_on_scroll() {
        let (mut engine, _clock, mut surface) = engine();
        let id = ElementId(2);
        surface.attach(id, Rect::new(0.0, 1200.0, 1200.0, 400.0));
        let handle = engine
            .reveal(id, RevealOptions::new(0.1, RootMargin::uniform(-100.0)), &mut surface)
            .unwrap();

        engine.frame(&mut surface);
        assert_eq!(engine.reveal_state(handle), Some(VisibilityState::NotYetRevealed));

        engine.handle(MotionEvent::Scroll { offset: 700.0 }, &mut surface);
        let report = engine.frame(&mut surface);
        assert_eq!(report.revealed, vec![handle]);
        assert_eq!(engine.pending_reveals(), 0);
    }

    #[test]
    fn test_host_delivered_intersections() {
        let clock = ManualClock::new();
        let options = EngineOptions {
            measure_reveals: false,
            ..Default::default()
        };
        let mut engine = MotionEngine::new(clock, MotionPreferences::default(), options);
        let mut surface = MemorySurface::new();
        let id = ElementId(3);
        surface.attach(id, Rect::new(0.0, 0.0, 10.0, 10.0));
        let margin: RootMargin = "-100px".parse().unwrap();
        let handle = engine.reveal(id, RevealOptions::new(0.1, margin), &mut surface).unwrap();

        engine.handle(MotionEvent::Intersection { reveal: handle, ratio: 0.05 }, &mut surface);
        assert_eq!(engine.reveal_state(handle), Some(VisibilityState::NotYetRevealed));
        engine.handle(MotionEvent::Intersection { reveal: handle, ratio: 0.2 }, &mut surface);
        assert_eq!(engine.reveal_state(handle), Some(VisibilityState::Revealed));
    }

    #[test]
    fn test_follower_moves_element_each_frame() {
        let (mut engine, _clock, mut surface) = engine();
        let cursor = ElementId(9);
        let link = ElementId(10);
        surface.attach(cursor, Rect::new(0.0, 0.0, 1.0, 1.0));
        engine.follow_pointer(cursor);
        engine.register_interactive(link);

        engine.handle(MotionEvent::PointerMove { x: 100.0, y: 200.0 }, &mut surface);
        let report = engine.frame(&mut surface);
        assert_eq!(report.follower, Some(Point::new(10.0, 20.0)));
        assert_eq!(surface.style(cursor).unwrap().translate_x, Some(Measure::px(10.0)));

        engine.handle(MotionEvent::PointerEnter(link), &mut surface);
        assert!(engine.follower().is_hovering());
        engine.handle(MotionEvent::PointerLeave(link), &mut surface);
        assert!(!engine.follower().is_hovering());
    }

    #[test]
    fn test_follower_disabled_on_narrow_viewport() {
        let clock = ManualClock::new();
        let options = EngineOptions {
            min_follower_width: 1024.0,
            ..Default::default()
        };
        let mut engine = MotionEngine::new(clock, MotionPreferences::default(), options);
        let mut surface = MemorySurface::new();
        surface.attach(ElementId(1), Rect::new(0.0, 0.0, 1.0, 1.0));
        engine.follow_pointer(ElementId(1));

        engine.handle(MotionEvent::Resize { width: 800.0, height: 600.0 }, &mut surface);
        assert!(!engine.follower_active());
        assert_eq!(engine.frame(&mut surface).follower, None);

        engine.handle(MotionEvent::Resize { width: 1280.0, height: 800.0 }, &mut surface);
        assert!(engine.follower_active());
    }

    #[test]
    fn test_set_viewport_schedules_one_update() {
        let clock = ManualClock::new();
        let mut engine = MotionEngine::new(clock, MotionPreferences::default(), EngineOptions::default());
        let mut surface = MemorySurface::new();
        let id = tall_element(&mut surface);
        engine.bind(
            PropertyBinding::new(id, ScrollSource::new(document_range()))
                .opacity(Mapping::numeric(&[0.0, 1.0], &[1.0, 0.0]).unwrap()),
        );
        engine.frame(&mut surface);
        assert!(!engine.has_pending_update());

        let mut viewport = Viewport::new(1200.0, 800.0);
        viewport.scroll = 500.0;
        engine.set_viewport(viewport);
        assert!(engine.has_pending_update());
        assert_eq!(surface.style(id).unwrap().opacity, Some(1.0));

        assert!(engine.frame(&mut surface).updated);
        assert_eq!(surface.style(id).unwrap().opacity, Some(0.5));
    }

    #[test]
    fn test_tick_follows_clock() {
        let (mut engine, clock, mut surface) = engine();
        assert!(engine.tick(&mut surface).is_some());
        assert!(engine.tick(&mut surface).is_none());
        clock.advance(Duration::from_millis(17));
        assert!(engine.tick(&mut surface).is_some());
    }

    #[test]
    fn test_teardown_releases_everything() {
        let (mut engine, clock, mut surface) = engine();
        let id = tall_element(&mut surface);
        engine.bind(
            PropertyBinding::new(id, ScrollSource::new(document_range()))
                .opacity(Mapping::numeric(&[0.0, 1.0], &[1.0, 0.0]).unwrap()),
        );
        engine.follow_pointer(id);
        engine.register_interactive(ElementId(4));
        assert_eq!(engine.registrations().len(), 3);

        engine.teardown();
        assert!(engine.is_torn_down());
        assert!(engine.registrations().is_empty());
        assert_eq!(engine.binding_count(), 0);
        assert!(!engine.has_pending_update());

        let writes = surface.writes(id);
        engine.handle(MotionEvent::Scroll { offset: 300.0 }, &mut surface);
        engine.handle(MotionEvent::PointerMove { x: 5.0, y: 5.0 }, &mut surface);
        clock.advance(Duration::from_secs(1));
        assert!(engine.tick(&mut surface).is_none());
        assert_eq!(engine.frame(&mut surface), FrameReport::default());
        assert_eq!(surface.writes(id), writes);
        assert!(engine.bind(PropertyBinding::new(id, ScrollSource::new(document_range()))).is_none());
    }

    #[test]
    fn test_unregister_binding_stops_updates() {
        let (mut engine, _clock, mut surface) = engine();
        let id = tall_element(&mut surface);
        let handle = engine
            .bind(
                PropertyBinding::new(id, ScrollSource::new(document_range()))
                    .opacity(Mapping::numeric(&[0.0, 1.0], &[1.0, 0.0]).unwrap()),
            )
            .unwrap();
        engine.frame(&mut surface);
        engine.unregister(Registration::Binding(handle));
        engine.unregister(Registration::Binding(handle));

        let writes = surface.writes(id);
        engine.handle(MotionEvent::Scroll { offset: 600.0 }, &mut surface);
        engine.frame(&mut surface);
        assert_eq!(surface.writes(id), writes);
        assert!(engine.registrations().is_empty());
    }
}
