use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use averbuch_core::motion::Clock;

use crate::app::{App, Mode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render<C: Clock + Clone>(frame: &mut Frame, area: Rect, app: &App<C>) {
        let theme = &app.theme;
        let mode_str = match app.mode {
            Mode::Normal => "PREVIEW",
            Mode::Help => "HELP",
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let motion = if app.prefs.reduced_motion() { " | reduced motion" } else { "" };
            format!(
                " {} | {} | {:>3}%{}",
                mode_str,
                app.variant,
                app.scroll_percent(),
                motion
            )
        };

        let help_hint = " q:quit j/k:scroll gg/G:top/bottom i:inquire v:variant ?:help ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let bar = Style::default().bg(theme.status_bg);
        let line = Line::from(vec![
            Span::styled(status_text, bar.fg(theme.status_fg)),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(theme.muted)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
