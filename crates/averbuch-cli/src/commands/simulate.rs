use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;

use averbuch_core::motion::timing::frame_interval;
use averbuch_core::motion::{EngineOptions, ManualClock, MemorySurface, MotionEngine, MotionEvent, MotionPreferences, Viewport};
use averbuch_core::site::{self, BlockKind, CellMetrics, Page, Variant};
use averbuch_core::AppConfig;

pub struct Options {
    pub variant: Variant,
    pub width: f64,
    pub height: f64,
    pub step: f64,
    pub json: bool,
}

/// What one simulated frame looked like
#[derive(Debug, Serialize)]
struct FrameLine {
    scroll: f64,
    hero_opacity: Option<f64>,
    nav_opacity: Option<f64>,
    bindings_applied: usize,
    revealed: Vec<String>,
}

pub async fn run(config: &AppConfig, prefs: MotionPreferences, options: Options) -> Result<()> {
    let metrics = CellMetrics::default();
    let page = Page::layout(options.width, options.height, metrics);
    let mut surface = MemorySurface::new();
    for block in page.blocks() {
        surface.attach(block.id, block.bounds);
    }

    let clock = ManualClock::new();
    let mut engine_options = EngineOptions::from_config(config);
    engine_options.min_follower_width *= metrics.width;
    let mut engine = MotionEngine::new(clock.clone(), prefs, engine_options);
    engine.set_viewport(Viewport::new(page.width(), page.viewport_height()));
    let handles = site::install(
        &page,
        &mut engine,
        &mut surface,
        &config.motion,
        options.variant,
        &HashSet::new(),
    )?;

    let hero = match options.variant {
        Variant::Animated => page.id_of(BlockKind::HeroContent),
        Variant::Static => page.id_of(BlockKind::Hero),
    };
    let nav = page.id_of(BlockKind::Nav);
    let interval = frame_interval(config.motion.animation_fps);
    let step = options.step.max(1.0);

    if !options.json {
        println!(
            "{} variant, {}x{} viewport, page height {}, {} reveals",
            options.variant,
            page.width(),
            page.viewport_height(),
            page.height(),
            handles.reveal_count()
        );
        println!("{:>8}  {:>6}  {:>6}  {:>8}  revealed", "scroll", "hero", "nav", "applied");
    }

    let mut offset = 0.0;
    loop {
        engine.handle(MotionEvent::Scroll { offset }, &mut surface);
        clock.advance(interval);
        let report = engine.frame(&mut surface);

        let line = FrameLine {
            scroll: offset,
            hero_opacity: hero.and_then(|id| surface.style(id)).and_then(|s| s.opacity),
            nav_opacity: nav.and_then(|id| surface.style(id)).and_then(|s| s.opacity),
            bindings_applied: report.bindings_applied,
            revealed: report
                .revealed
                .iter()
                .filter_map(|id| handles.revealed_kind(*id))
                .map(|kind| format!("{:?}", kind))
                .collect(),
        };

        if options.json {
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!(
                "{:>8.0}  {:>6}  {:>6}  {:>8}  {}",
                line.scroll,
                fmt_opacity(line.hero_opacity),
                fmt_opacity(line.nav_opacity),
                line.bindings_applied,
                line.revealed.join(", ")
            );
        }

        if offset >= page.max_scroll() {
            break;
        }
        offset = (offset + step).min(page.max_scroll());
    }

    engine.teardown();
    Ok(())
}

fn fmt_opacity(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}
