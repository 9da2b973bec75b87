use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use averbuch_core::site::{content::SITE_NAME, Variant};
use averbuch_core::{AppConfig, MotionPreferences};
use averbuch_tui::{
    app::{App, Mode, STATUS_ROWS},
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event},
    widgets::{CursorWidget, HelpWidget, PageWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>, prefs: MotionPreferences, variant: Variant) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle(SITE_NAME))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match terminal.size() {
        Ok(size) => match App::new(config.clone(), prefs, variant, size.width, size.height) {
            Ok(mut app) => {
                info!(variant = %variant, cols = size.width, rows = size.height, "Preview started");
                let event_handler =
                    EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.motion.animation_fps);
                let result = main_loop(&mut terminal, &mut app, &event_handler);
                app.engine.teardown();
                result
            }
            Err(e) => Err(e),
        },
        Err(e) => Err(e.into()),
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, event_handler: &EventHandler) -> Result<()> {
    // Start at animation rate so the loading bar plays out
    let mut needs_fast_update = true;

    loop {
        app.tick();

        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(STATUS_ROWS)])
                .split(frame.area());

            PageWidget::render(frame, layout[0], app);
            CursorWidget::render(frame, layout[0], app);
            StatusBarWidget::render(frame, layout[1], app);

            if app.mode == Mode::Help {
                HelpWidget::render(frame, &app.theme);
            }
        })?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app.mode, app.pending_key);
                    app.handle_action(action)?;
                }
                AppEvent::Mouse(mouse) => {
                    let action = handle_mouse_event(mouse, app.page_rows());
                    app.handle_action(action)?;
                }
                AppEvent::Resize(cols, rows) => app.resize(cols, rows)?,
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
