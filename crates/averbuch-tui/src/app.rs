use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use averbuch_core::motion::{
    Clock, ElementId, EngineOptions, MotionEngine, MotionEvent, MotionPreferences, Point, Registration, Style,
    Surface, SystemClock, Transition, VisibilityState, Viewport,
};
use averbuch_core::site::{self, BlockKind, CellMetrics, LoadingBar, Page, SceneHandles, Variant};
use averbuch_core::AppConfig;

use crate::input::Action;
use crate::scroll::ScrollAnimator;
use crate::surface::TerminalSurface;
use crate::theme::Theme;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
}

/// Rows taken by the status bar
pub const STATUS_ROWS: u16 = 1;

/// Application state for the page preview
pub struct App<C: Clock + Clone = SystemClock> {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub prefs: MotionPreferences,
    pub variant: Variant,
    pub metrics: CellMetrics,
    pub page: Page,
    pub engine: MotionEngine<C>,
    pub surface: TerminalSurface<C>,
    pub scroll: ScrollAnimator<C>,
    pub loading: LoadingBar,
    pub mode: Mode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Pending key for multi-key sequences (e.g. 'gg')
    pub pending_key: Option<char>,
    clock: C,
    handles: SceneHandles,
    hovered: Option<ElementId>,
    /// Last pointer position in viewport pixels
    pointer: Option<Point>,
    /// Text shown in the inquiry form's status row
    inquiry_status: Option<String>,
    cols: u16,
    rows: u16,
}

impl App<SystemClock> {
    pub fn new(
        config: Arc<AppConfig>,
        prefs: MotionPreferences,
        variant: Variant,
        cols: u16,
        rows: u16,
    ) -> Result<Self> {
        Self::with_clock(config, prefs, variant, SystemClock::new(), cols, rows)
    }
}

/// Engine options with the follower width converted from columns to pixels
fn engine_options(config: &AppConfig, metrics: CellMetrics) -> EngineOptions {
    let mut options = EngineOptions::from_config(config);
    options.min_follower_width *= metrics.width;
    options
}

impl<C: Clock + Clone> App<C> {
    pub fn with_clock(
        config: Arc<AppConfig>,
        prefs: MotionPreferences,
        variant: Variant,
        clock: C,
        cols: u16,
        rows: u16,
    ) -> Result<Self> {
        let metrics = CellMetrics::default();
        let page = Page::layout(1.0, 1.0, metrics);
        let mut scroll = ScrollAnimator::new(clock.clone(), &config.ui);
        scroll.set_smooth(!prefs.reduced_motion());

        let mut app = Self {
            engine: MotionEngine::new(clock.clone(), prefs, engine_options(&config, metrics)),
            surface: TerminalSurface::new(clock.clone()),
            config,
            theme: Theme::default(),
            prefs,
            variant,
            metrics,
            page,
            scroll,
            loading: LoadingBar::new(),
            mode: Mode::Normal,
            should_quit: false,
            status_message: None,
            pending_key: None,
            clock,
            handles: SceneHandles::default(),
            hovered: None,
            pointer: None,
            inquiry_status: None,
            cols,
            rows,
        };
        app.rebuild(&HashSet::new())?;
        app.loading.loaded(app.clock.now());
        Ok(app)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Rows available to the page (terminal minus status bar)
    pub fn page_rows(&self) -> u16 {
        self.rows.saturating_sub(STATUS_ROWS).max(1)
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Lay the page out for the current size and install a fresh engine.
    ///
    /// Kinds in `revealed` start shown.
    fn rebuild(&mut self, revealed: &HashSet<BlockKind>) -> Result<()> {
        let width = self.cols.max(1) as f64 * self.metrics.width;
        let height = self.page_rows() as f64 * self.metrics.height;
        self.page = Page::layout(width, height, self.metrics);
        self.surface.load(&self.page);

        self.engine.teardown();
        self.engine = MotionEngine::new(self.clock.clone(), self.prefs, engine_options(&self.config, self.metrics));
        let offset = self.scroll.current().min(self.page.max_scroll());
        self.scroll.set(offset);
        self.engine.set_viewport(Viewport {
            scroll: offset,
            width: self.page.width(),
            height: self.page.viewport_height(),
        });

        self.handles = site::install(
            &self.page,
            &mut self.engine,
            &mut self.surface,
            &self.config.motion,
            self.variant,
            revealed,
        )?;
        if self.inquiry_status.is_some() {
            if let Some(status) = self.page.id_of(BlockKind::InquiryStatus) {
                self.surface.apply(status, &Style::SHOWN, &Transition::INSTANT);
            }
        }
        self.hovered = None;
        if let Some(pointer) = self.pointer {
            self.engine
                .handle(MotionEvent::PointerMove { x: pointer.x, y: pointer.y }, &mut self.surface);
            self.refresh_hover();
        }
        self.engine.frame(&mut self.surface);

        debug!(
            cols = self.cols,
            rows = self.rows,
            height = self.page.height(),
            variant = %self.variant,
            "Page laid out"
        );
        Ok(())
    }

    /// Kinds whose reveal or entrance has already played
    pub fn revealed_kinds(&self) -> HashSet<BlockKind> {
        self.handles
            .registrations
            .iter()
            .filter_map(|registration| match registration {
                Registration::Reveal(id) if self.engine.reveal_state(*id) == Some(VisibilityState::Revealed) => {
                    self.handles.revealed_kind(*id)
                }
                _ => None,
            })
            .chain(self.handles.shown_kinds().iter().copied())
            .collect()
    }

    /// Terminal resized; keeps scroll position and already revealed sections
    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<()> {
        if (cols, rows) == (self.cols, self.rows) {
            return Ok(());
        }
        let revealed = self.revealed_kinds();
        self.cols = cols;
        self.rows = rows;
        self.rebuild(&revealed)
    }

    /// Advance scroll animation and the motion engine by one frame
    pub fn tick(&mut self) {
        let offset = self.scroll.update(self.page.max_scroll());
        if (offset - self.engine.viewport().scroll).abs() > f64::EPSILON {
            self.engine.handle(MotionEvent::Scroll { offset }, &mut self.surface);
            // Content moved under a resting pointer
            self.refresh_hover();
        }
        if let Some(report) = self.engine.tick(&mut self.surface) {
            if !report.revealed.is_empty() {
                let kinds: Vec<String> = report
                    .revealed
                    .iter()
                    .filter_map(|id| self.handles.revealed_kind(*id))
                    .map(|kind| format!("{:?}", kind))
                    .collect();
                debug!(revealed = ?kinds, "Sections revealed");
            }
        }
        self.surface.settle();
    }

    /// Whether the next frame should come at animation rate
    pub fn needs_fast_update(&self) -> bool {
        let now = self.clock.now();
        self.scroll.needs_update()
            || self.engine.has_pending_update()
            || self.surface.is_animating()
            || (self.engine.follower_active() && !self.engine.follower().is_settled(0.5))
            || !self.loading.is_removed(now)
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll.current()
    }

    /// Scroll position as a percentage of the scrollable height
    pub fn scroll_percent(&self) -> u16 {
        let max = self.page.max_scroll();
        if max <= 0.0 {
            return 100;
        }
        ((self.scroll.current() / max) * 100.0).round().clamp(0.0, 100.0) as u16
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    pub fn inquiry_status(&self) -> Option<&str> {
        self.inquiry_status.as_deref()
    }

    /// Whether the mouse has been seen over the page yet
    pub fn has_pointer(&self) -> bool {
        self.pointer.is_some()
    }

    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        if action != Action::PendingG {
            self.pending_key = None;
        }
        let max = self.page.max_scroll();
        let line = self.config.ui.scroll_lines.max(1) as f64 * self.metrics.height;
        let viewport = self.page.viewport_height();

        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroll.scroll_by(line, max),
            Action::ScrollUp => self.scroll.scroll_by(-line, max),
            Action::WheelDown => self.scroll.scroll_by(3.0 * self.metrics.height, max),
            Action::WheelUp => self.scroll.scroll_by(-3.0 * self.metrics.height, max),
            Action::ScrollHalfPageDown => self.scroll.scroll_by(viewport / 2.0, max),
            Action::ScrollHalfPageUp => self.scroll.scroll_by(-viewport / 2.0, max),
            Action::ScrollPageDown => self.scroll.scroll_by(viewport, max),
            Action::ScrollPageUp => self.scroll.scroll_by(-viewport, max),
            Action::PendingG => self.pending_key = Some('g'),
            Action::JumpToTop => self.jump_to("#top"),
            Action::JumpToBottom => self.scroll.scroll_to(max, max),
            Action::JumpToInquiry => self.jump_to("#inquire"),
            Action::ToggleVariant => {
                self.variant = match self.variant {
                    Variant::Animated => Variant::Static,
                    Variant::Static => Variant::Animated,
                };
                info!(variant = %self.variant, "Switched page variant");
                self.status_message = Some(format!("Variant: {}", self.variant));
                self.rebuild(&HashSet::new())?;
            }
            Action::ToggleHelp => {
                self.mode = match self.mode {
                    Mode::Help => Mode::Normal,
                    Mode::Normal => Mode::Help,
                };
            }
            Action::ExitMode => {
                self.mode = Mode::Normal;
                self.status_message = None;
            }
            Action::PointerMove(col, row) => self.pointer_moved(col, row),
            Action::Click(col, row) => {
                self.pointer_moved(col, row);
                self.click();
            }
            Action::None => {}
        }
        Ok(())
    }

    fn jump_to(&mut self, anchor: &str) {
        if let Some(target) = self.page.anchor_offset(anchor) {
            debug!(anchor, target, "Anchor navigation");
            self.scroll.scroll_to(target, self.page.max_scroll());
        }
    }

    /// Pointer moved to a cell; updates the follower target and hover state
    fn pointer_moved(&mut self, col: u16, row: u16) {
        let x = col as f64 * self.metrics.width + self.metrics.width / 2.0;
        let y = row as f64 * self.metrics.height + self.metrics.height / 2.0;
        self.pointer = Some(Point::new(x, y));
        self.engine.handle(MotionEvent::PointerMove { x, y }, &mut self.surface);
        self.refresh_hover();
    }

    /// Hit-test the last pointer position against the page at the current
    /// scroll offset and emit enter/leave on change
    fn refresh_hover(&mut self) {
        let Some(pointer) = self.pointer else {
            return;
        };
        let document = Point::new(pointer.x, pointer.y + self.scroll.current());
        let over = self.page.interactive_at(document);
        if over != self.hovered {
            if let Some(previous) = self.hovered {
                self.engine.handle(MotionEvent::PointerLeave(previous), &mut self.surface);
            }
            if let Some(element) = over {
                self.engine.handle(MotionEvent::PointerEnter(element), &mut self.surface);
            }
            self.hovered = over;
        }
    }

    fn click(&mut self) {
        let Some(kind) = self.hovered.and_then(|id| self.page.block(id)).map(|b| b.kind) else {
            return;
        };
        match kind {
            BlockKind::HeroLink => self.jump_to("#inquire"),
            BlockKind::InquiryButton => {
                self.inquiry_status = Some("Run `averbuch inquire` to send an inquiry".to_string());
                site::announce(&self.page, &mut self.surface, &self.prefs);
            }
            BlockKind::FooterLinks => {
                self.status_message =
                    Some("`averbuch apply` for applications, `averbuch legal` for the legal notice".to_string());
            }
            _ => {}
        }
    }
}
