//! Motion wiring for the index page
//!
//! Two renditions of the same page exist. [`Variant::Animated`] is the full
//! scroll-linked version (hero and image parallax, per-item reveals).
//! [`Variant::Static`] is the lightweight one: a gentle hero drift, whole
//! sections fading up, and a nav backdrop that darkens once the page scrolls.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use super::layout::{BlockKind, Page};
use crate::config::MotionConfig;
use crate::motion::binding::PropertyBinding;
use crate::motion::easing::EasingCurve;
use crate::motion::engine::{MotionEngine, Registration};
use crate::motion::geometry::RootMargin;
use crate::motion::mapping::{Keyframes, Mapping, Measure, Unit};
use crate::motion::preferences::MotionPreferences;
use crate::motion::progress::{ScrollRange, ScrollSource};
use crate::motion::reveal::{RevealId, RevealOptions};
use crate::motion::style::{Style, Transition};
use crate::motion::surface::{ElementId, Surface};
use crate::motion::timing::Clock;
use crate::{Error, Result};

/// Which rendition of the page to animate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Animated,
    Static,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Animated => write!(f, "animated"),
            Variant::Static => write!(f, "static"),
        }
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "animated" | "full" => Ok(Variant::Animated),
            "static" | "lite" => Ok(Variant::Static),
            other => Err(Error::Other(format!("unknown page variant '{}'", other))),
        }
    }
}

/// Nav backdrop opacity before and after the page has scrolled
const NAV_OPACITY: [f64; 2] = [0.8, 0.95];

/// Resting opacity of the hero scroll hint
const INDICATOR_OPACITY: f64 = 0.3;

/// How the form status row drops into place
pub const STATUS_TRANSITION: Transition = Transition {
    duration: Duration::from_millis(300),
    delay: Duration::ZERO,
    curve: EasingCurve::EaseOut,
};

/// What [`install`] registered
#[derive(Debug, Default)]
pub struct SceneHandles {
    pub registrations: Vec<Registration>,
    reveals: HashMap<RevealId, BlockKind>,
    /// Blocks already at their final style: on-mount entrances and blocks
    /// revealed in an earlier layout
    shown: Vec<BlockKind>,
}

impl SceneHandles {
    /// Block revealed by a reveal handle
    pub fn revealed_kind(&self, id: RevealId) -> Option<BlockKind> {
        self.reveals.get(&id).copied()
    }

    pub fn reveal_count(&self) -> usize {
        self.reveals.len()
    }

    pub fn shown_kinds(&self) -> &[BlockKind] {
        &self.shown
    }
}

struct Installer<'a, C: Clock> {
    page: &'a Page,
    engine: &'a mut MotionEngine<C>,
    surface: &'a mut dyn Surface,
    already_revealed: &'a HashSet<BlockKind>,
    handles: SceneHandles,
}

impl<'a, C: Clock> Installer<'a, C> {
    fn id(&self, kind: BlockKind) -> Result<ElementId> {
        self.page
            .id_of(kind)
            .ok_or_else(|| Error::Other(format!("page has no {:?} block", kind)))
    }

    fn bind(&mut self, binding: PropertyBinding) {
        if let Some(id) = self.engine.bind(binding) {
            self.handles.registrations.push(Registration::Binding(id));
        }
    }

    /// Register a reveal, or show the block at once if it was revealed in an
    /// earlier layout
    fn reveal(&mut self, kind: BlockKind, options: RevealOptions) -> Result<()> {
        let element = self.id(kind)?;
        if self.already_revealed.contains(&kind) {
            self.surface.apply(element, &options.shown, &Transition::INSTANT);
            self.handles.shown.push(kind);
            return Ok(());
        }
        if let Some(id) = self.engine.reveal(element, options, &mut *self.surface) {
            self.handles.registrations.push(Registration::Reveal(id));
            self.handles.reveals.insert(id, kind);
        }
        Ok(())
    }

    /// Reveal `kind` once the block `trigger` comes into view
    fn reveal_with(&mut self, kind: BlockKind, trigger: BlockKind, options: RevealOptions) -> Result<()> {
        let trigger = self.id(trigger)?;
        self.reveal(kind, options.observing(trigger))
    }

    /// On-mount entrance from `from` to `to`, skipped when it already played
    /// in an earlier layout
    fn intro(&mut self, kind: BlockKind, from: Style, to: Style, transition: Transition) -> Result<()> {
        let element = self.id(kind)?;
        self.handles.shown.push(kind);
        if self.already_revealed.contains(&kind) {
            self.surface.apply(element, &to, &Transition::INSTANT);
            return Ok(());
        }
        let transition = self.engine.prefs().transition(transition);
        self.surface.apply(element, &from, &Transition::INSTANT);
        self.surface.apply(element, &to, &transition);
        Ok(())
    }

    fn follower(&mut self) -> Result<()> {
        let cursor = self.id(BlockKind::Cursor)?;
        if let Some(registration) = self.engine.follow_pointer(cursor) {
            self.handles.registrations.push(registration);
        }
        let interactive: Vec<ElementId> = self
            .page
            .blocks()
            .iter()
            .filter(|b| b.kind.is_interactive())
            .map(|b| b.id)
            .collect();
        for element in interactive {
            if let Some(registration) = self.engine.register_interactive(element) {
                self.handles.registrations.push(registration);
            }
        }
        Ok(())
    }
}

/// Register every binding and reveal for `page` with `engine`.
///
/// Blocks listed in `already_revealed` are shown immediately instead of being
/// observed again (used when the page is laid out anew after a resize).
pub fn install<C: Clock>(
    page: &Page,
    engine: &mut MotionEngine<C>,
    surface: &mut dyn Surface,
    motion: &MotionConfig,
    variant: Variant,
    already_revealed: &HashSet<BlockKind>,
) -> Result<SceneHandles> {
    let mut installer = Installer {
        page,
        engine,
        surface,
        already_revealed,
        handles: SceneHandles::default(),
    };

    match variant {
        Variant::Animated => install_animated(&mut installer, motion)?,
        Variant::Static => install_static(&mut installer, motion)?,
    }
    let status = installer.id(BlockKind::InquiryStatus)?;
    installer.surface.apply(status, &Style::opacity(0.0), &Transition::INSTANT);
    installer.follower()?;

    debug!(
        %variant,
        registrations = installer.handles.registrations.len(),
        reveals = installer.handles.reveals.len(),
        "Scene installed"
    );
    Ok(installer.handles)
}

/// Show the form status row: it drops 10px into place while fading in.
///
/// Returns `false` when the page has no status row.
pub fn announce(page: &Page, surface: &mut dyn Surface, prefs: &MotionPreferences) -> bool {
    let Some(status) = page.id_of(BlockKind::InquiryStatus) else {
        return false;
    };
    let above = Style::opacity(0.0).with_translate_y(Measure::px(-10.0));
    surface.apply(status, &above, &Transition::INSTANT);
    surface.apply(status, &Style::SHOWN, &prefs.transition(STATUS_TRANSITION))
}

/// Framer-style reveal: any overlap counts, ease-out
fn in_view(margin: f64, duration_secs: f64) -> RevealOptions {
    RevealOptions::new(0.0, RootMargin::uniform(margin))
        .duration(Duration::from_secs_f64(duration_secs))
        .curve(EasingCurve::EaseOut)
}

/// Ease-out entrance played once on load
fn entrance(duration_secs: f64, delay_secs: f64) -> Transition {
    Transition::new(Duration::from_secs_f64(duration_secs), EasingCurve::EaseOut)
        .with_delay(Duration::from_secs_f64(delay_secs))
}

fn install_animated<C: Clock>(s: &mut Installer<'_, C>, motion: &MotionConfig) -> Result<()> {
    let curve = motion.parallax_curve;

    // Hero: background drifts down, content fades and lifts over the first half
    let hero = s.id(BlockKind::Hero)?;
    let exit = ScrollSource::new(ScrollRange::exit());
    let background = s.id(BlockKind::HeroBackground)?;
    s.bind(
        PropertyBinding::new(background, exit)
            .tracking(hero)
            .translate_y(Mapping::measures(&[0.0, 1.0], &["0%", "50%"])?.with_curve(curve)),
    );
    let content = s.id(BlockKind::HeroContent)?;
    s.bind(
        PropertyBinding::new(content, exit)
            .tracking(hero)
            .opacity(Mapping::numeric(&[0.0, 0.5], &[1.0, 0.0])?.with_curve(curve))
            .translate_y(Mapping::measures(&[0.0, 0.5], &["0px", "-50px"])?.with_curve(curve)),
    );

    // Entrances on load, staggered top to bottom
    let hidden = Style::opacity(0.0);
    let visible = Style::opacity(1.0);
    s.intro(BlockKind::HeroLogo, hidden, visible, entrance(1.2, 0.0))?;
    s.intro(BlockKind::HeroDivider, Style::scale_x(0.0), Style::scale_x(1.0), entrance(1.0, 0.4))?;
    s.intro(BlockKind::HeroHeadline, Style::hidden(20.0), Style::SHOWN, entrance(1.0, 0.6))?;
    s.intro(BlockKind::HeroSubtext, Style::hidden(15.0), Style::SHOWN, entrance(1.0, 0.9))?;
    s.intro(BlockKind::HeroLink, hidden, visible, entrance(1.0, 1.3))?;
    s.intro(
        BlockKind::HeroIndicator,
        hidden,
        Style::opacity(INDICATOR_OPACITY),
        entrance(1.0, 2.0),
    )?;

    // Parallax imagery
    for index in 0..2 {
        let frame = s.id(BlockKind::ParallaxFrame(index))?;
        let traversal = ScrollSource::new(ScrollRange::traversal());
        let image = s.id(BlockKind::ParallaxImage(index))?;
        s.bind(
            PropertyBinding::new(image, traversal)
                .tracking(frame)
                .translate_y(Mapping::measures(&[0.0, 1.0], &["-25%", "25%"])?.with_curve(curve)),
        );
        let overlay = s.id(BlockKind::ParallaxOverlay(index))?;
        s.bind(
            PropertyBinding::new(overlay, traversal)
                .tracking(frame)
                .opacity(Mapping::numeric(&[0.0, 0.3, 0.7, 1.0], &[0.0, 1.0, 1.0, 0.0])?.with_curve(curve)),
        );
    }

    // One-shot reveals
    s.reveal(BlockKind::CapabilitiesLabel, in_view(-50.0, 0.8).fade())?;
    for index in 0..super::content::CAPABILITIES.len() {
        s.reveal(
            BlockKind::Capability(index),
            in_view(-100.0, 0.8)
                .offset(20.0)
                .delay(Duration::from_secs_f64(index as f64 * 0.15)),
        )?;
    }
    s.reveal(BlockKind::PhilosophyLabel, in_view(-100.0, 0.8).fade())?;
    for index in 0..super::content::STATEMENTS.len() {
        let statement = BlockKind::Statement(index);
        if index > 0 {
            s.reveal_with(
                BlockKind::StatementDot(index),
                statement,
                in_view(-80.0, 0.6).fade().delay(Duration::from_millis(100)),
            )?;
        }
        s.reveal_with(
            BlockKind::StatementText(index),
            statement,
            in_view(-80.0, 1.0).offset(20.0).delay(Duration::from_millis(200)),
        )?;
    }

    // The inquiry panel and its parts all key off the section
    let section = BlockKind::InquirySection;
    let step = |n: u64| Duration::from_millis(100 * n);
    s.reveal_with(BlockKind::InquiryPanel, section, in_view(-100.0, 0.8).offset(30.0))?;
    s.reveal_with(BlockKind::InquiryTitle, section, in_view(-100.0, 0.8).offset(20.0).delay(step(1)))?;
    s.reveal_with(
        BlockKind::InquiryDivider,
        section,
        in_view(-100.0, 0.8)
            .styles(Style::scale_x(0.0), Style::scale_x(1.0))
            .delay(step(2)),
    )?;
    s.reveal_with(BlockKind::InquiryIntro, section, in_view(-100.0, 0.8).fade().delay(step(3)))?;
    s.reveal_with(BlockKind::InquiryForm, section, in_view(-100.0, 0.8).offset(20.0).delay(step(4)))?;
    s.reveal(BlockKind::Footer, in_view(-50.0, 1.0).fade())?;
    Ok(())
}

fn install_static<C: Clock>(s: &mut Installer<'_, C>, motion: &MotionConfig) -> Result<()> {
    // Hero drifts at `hero_rate` px per scrolled px until it has scrolled away
    let hero = s.id(BlockKind::Hero)?;
    let drift = motion.hero_rate * s.page.viewport_height();
    s.bind(
        PropertyBinding::new(hero, ScrollSource::new(ScrollRange::exit()))
            .translate_y(Mapping::new(Keyframes::from_slices(&[0.0, 1.0], &[0.0, drift])?, Unit::Px)),
    );

    let indicator = s.id(BlockKind::HeroIndicator)?;
    s.surface
        .apply(indicator, &Style::opacity(INDICATOR_OPACITY), &Transition::INSTANT);

    // Nav backdrop steps up as soon as the marker is passed
    let nav = s.id(BlockKind::Nav)?;
    let marker = s.id(BlockKind::NavMarker)?;
    s.surface
        .apply(nav, &Style::opacity(NAV_OPACITY[0]), &Transition::INSTANT);
    s.bind(
        PropertyBinding::new(nav, ScrollSource::new(ScrollRange::exit()))
            .tracking(marker)
            .opacity(Mapping::numeric(&[0.0, 1.0], &NAV_OPACITY)?.with_curve(EasingCurve::Step)),
    );

    let options = motion.reveal.options()?;
    for kind in [
        BlockKind::CapabilitiesSection,
        BlockKind::PhilosophySection,
        BlockKind::InquirySection,
        BlockKind::Footer,
    ] {
        s.reveal(kind, options)?;
    }
    Ok(())
}
