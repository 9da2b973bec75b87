use ratatui::{layout::Rect, style::Style, Frame};

use averbuch_core::motion::Clock;
use averbuch_core::site::BlockKind;

use crate::app::App;

/// Pointer follower: a dot that trails the mouse and grows into a ring over links
pub struct CursorWidget;

impl CursorWidget {
    pub fn render<C: Clock + Clone>(frame: &mut Frame, area: Rect, app: &App<C>) {
        if !app.engine.follower_active() || !app.has_pointer() {
            return;
        }
        let Some(id) = app.page.id_of(BlockKind::Cursor) else {
            return;
        };
        let p = app.surface.presentation(id);
        let col = (p.dx / app.metrics.width).floor();
        let row = (p.dy / app.metrics.height).floor();
        if col < 0.0 || row < 0.0 || col >= area.width as f64 || row >= area.height as f64 {
            return;
        }

        let glyph = if app.engine.follower().is_hovering() { "◯" } else { "●" };
        frame.buffer_mut().set_string(
            area.x + col as u16,
            area.y + row as u16,
            glyph,
            Style::default().fg(app.theme.foreground),
        );
    }
}
