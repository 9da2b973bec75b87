use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::theme::Theme;

const KEYS: [(&str, &str); 9] = [
    ("j / k", "scroll a line"),
    ("Ctrl-d / Ctrl-u", "half page"),
    ("Space / Ctrl-b", "full page"),
    ("gg / G", "top / bottom"),
    ("i", "jump to the inquiry form"),
    ("v", "switch animated / static page"),
    ("mouse", "move the follower, click links"),
    ("?", "toggle this help"),
    ("q", "quit"),
];

pub struct HelpWidget;

impl HelpWidget {
    pub fn render(frame: &mut Frame, theme: &Theme) {
        let area = frame.area();
        let popup_width = 52u16.min(area.width.saturating_sub(4));
        let popup_height = (KEYS.len() as u16 + 2).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keys ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.surface));

        let lines: Vec<Line> = KEYS
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(
                        format!(" {:<16}", key),
                        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*what, Style::default().fg(theme.foreground)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
