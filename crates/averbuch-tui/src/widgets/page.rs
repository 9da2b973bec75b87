use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    Frame,
};

use averbuch_core::motion::Clock;
use averbuch_core::site::content::{self, PARALLAX_BOTTOM, PARALLAX_MID};
use averbuch_core::site::{Block, BlockKind, CellMetrics};

use crate::app::App;
use crate::surface::Presentation;
use crate::theme::{blend, Theme};

/// Columns of left padding for page text
const PADDING: i64 = 4;

/// Shading rows for the hero backdrop and the parallax imagery
const HERO_TEXTURE: [&str; 4] = ["·   ", "  · ", " ·  ", "   ·"];
const IMAGE_TEXTURE: [&str; 6] = ["░░▒▒", "░▒▒▓", "▒▒▓▓", "▒▓▓▒", "▓▓▒▒", "▓▒▒░"];

/// Page area in document space
struct View {
    area: Rect,
    scroll: f64,
    metrics: CellMetrics,
}

impl View {
    /// Screen row of a document-space y, relative to the area
    fn row_of(&self, doc_y: f64) -> i64 {
        ((doc_y - self.scroll) / self.metrics.height).round() as i64
    }

    fn put(&self, buf: &mut Buffer, col: i64, row: i64, text: &str, style: Style) {
        if row < 0 || row >= self.area.height as i64 || col >= self.area.width as i64 {
            return;
        }
        let col = col.max(0) as u16;
        let width = (self.area.width - col) as usize;
        buf.set_stringn(self.area.x + col, self.area.y + row as u16, text, width, style);
    }

    fn fill_row(&self, buf: &mut Buffer, row: i64, pattern: &str, style: Style) {
        let line: String = pattern.chars().cycle().take(self.area.width as usize).collect();
        self.put(buf, 0, row, &line, style);
    }
}

pub struct PageWidget;

impl PageWidget {
    pub fn render<C: Clock + Clone>(frame: &mut Frame, area: Rect, app: &App<C>) {
        let theme = &app.theme;
        let buf = frame.buffer_mut();
        buf.set_style(area, Style::default().bg(theme.background).fg(theme.foreground));

        let view = View {
            area,
            scroll: app.scroll_offset(),
            metrics: app.metrics,
        };

        let link_hovered = app.hovered().is_some() && app.hovered() == app.page.id_of(BlockKind::HeroLink);

        for block in app.page.blocks() {
            match block.kind {
                BlockKind::HeroBackground => render_hero_backdrop(buf, &view, app, block),
                BlockKind::ParallaxImage(index) => render_parallax(buf, &view, app, block, index),
                BlockKind::Nav | BlockKind::NavMarker | BlockKind::Cursor => {}
                BlockKind::InquiryStatus => render_status(buf, &view, app, block),
                _ if !block.lines.is_empty() => {
                    let presentation = app.surface.presentation(block.id);
                    render_text(buf, &view, theme, block, presentation, link_hovered);
                }
                _ => {}
            }
        }

        render_nav(buf, &view, app);
        render_loading_bar(buf, &view, app);
    }
}

fn render_text(
    buf: &mut Buffer,
    view: &View,
    theme: &Theme,
    block: &Block,
    p: Presentation,
    link_hovered: bool,
) {
    if p.opacity <= 0.01 {
        return;
    }
    let first = view.row_of(block.bounds.top() + p.dy);
    let col = PADDING + (p.dx / view.metrics.width).round() as i64;

    for (i, line) in block.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let (color, modifier) = line_style(theme, block, i, link_hovered);
        let style = Style::default()
            .fg(theme.fade(color, p.opacity))
            .bg(theme.background)
            .add_modifier(modifier);
        let (offset, visible) = scaled(line, p.scale_x);
        view.put(buf, col + offset as i64, first + i as i64, &visible, style);
    }
}

/// Part of `line` left when it is scaled horizontally about its centre,
/// with the column offset of that part
fn scaled(line: &str, scale: f64) -> (usize, String) {
    if scale >= 1.0 {
        return (0, line.to_string());
    }
    let len = line.chars().count();
    let keep = ((len as f64 * scale.max(0.0)).ceil() as usize).min(len);
    let skip = (len - keep) / 2;
    (skip, line.chars().skip(skip).take(keep).collect())
}

/// Form status text, drawn in the row reserved above the send button
fn render_status<C: Clock + Clone>(buf: &mut Buffer, view: &View, app: &App<C>, block: &Block) {
    let Some(text) = app.inquiry_status() else {
        return;
    };
    let p = app.surface.presentation(block.id);
    if p.opacity <= 0.01 {
        return;
    }
    let style = Style::default()
        .fg(app.theme.fade(app.theme.accent, p.opacity))
        .bg(app.theme.background);
    let col = PADDING + (p.dx / view.metrics.width).round() as i64;
    view.put(buf, col, view.row_of(block.bounds.top() + p.dy), text, style);
}

/// Colour and weight of one text row
fn line_style(theme: &Theme, block: &Block, index: usize, hovered: bool) -> (Color, Modifier) {
    match block.kind {
        BlockKind::CapabilitiesLabel | BlockKind::PhilosophyLabel => (theme.label, Modifier::empty()),
        BlockKind::Capability(_) if index == 0 => (theme.foreground, Modifier::BOLD),
        BlockKind::Capability(_) => (theme.muted, Modifier::empty()),
        BlockKind::HeroLink => {
            let modifier = if hovered {
                Modifier::UNDERLINED | Modifier::BOLD
            } else {
                Modifier::UNDERLINED
            };
            (theme.accent, modifier)
        }
        BlockKind::HeroLogo | BlockKind::HeroHeadline | BlockKind::InquiryTitle => (theme.foreground, Modifier::BOLD),
        BlockKind::HeroDivider
        | BlockKind::InquiryDivider
        | BlockKind::HeroIndicator
        | BlockKind::StatementDot(_) => (theme.accent, Modifier::empty()),
        BlockKind::HeroSubtext | BlockKind::InquiryIntro | BlockKind::InquiryForm => (theme.muted, Modifier::empty()),
        BlockKind::InquiryButton => (theme.accent, Modifier::BOLD),
        BlockKind::FooterContact => (theme.label, Modifier::empty()),
        BlockKind::FooterLinks if index == 0 => (theme.foreground, Modifier::ITALIC),
        BlockKind::FooterLinks => (theme.muted, Modifier::empty()),
        _ => (theme.foreground, Modifier::empty()),
    }
}

fn render_hero_backdrop<C: Clock + Clone>(buf: &mut Buffer, view: &View, app: &App<C>, block: &Block) {
    let Some(hero) = block.parent.and_then(|id| app.page.block(id)) else {
        return;
    };
    let p = app.surface.presentation(block.id);
    let color = app.theme.fade(app.theme.image_dark, p.opacity);
    let style = Style::default().fg(color).bg(app.theme.background);
    render_texture(buf, view, hero, block.bounds.top() + p.dy, &HERO_TEXTURE, style);
}

fn render_parallax<C: Clock + Clone>(buf: &mut Buffer, view: &View, app: &App<C>, block: &Block, index: usize) {
    let Some(frame) = block.parent.and_then(|id| app.page.block(id)) else {
        return;
    };
    let image = app.surface.presentation(block.id);
    let base_overlay = if index == 0 {
        PARALLAX_MID.overlay_opacity
    } else {
        PARALLAX_BOTTOM.overlay_opacity
    };
    let overlay = app
        .page
        .id_of(BlockKind::ParallaxOverlay(index))
        .map(|id| app.surface.presentation(id).opacity)
        .unwrap_or(1.0)
        * base_overlay;

    let shade = blend(app.theme.image_light, app.theme.image_dark, 1.0 - overlay);
    let style = Style::default()
        .fg(app.theme.fade(shade, image.opacity))
        .bg(app.theme.background);
    render_texture(buf, view, frame, block.bounds.top() + image.dy, &IMAGE_TEXTURE, style);
}

/// Fill the rows of `clip` with a texture anchored at `texture_top`
fn render_texture(buf: &mut Buffer, view: &View, clip: &Block, texture_top: f64, glyphs: &[&str], style: Style) {
    let first = view.row_of(clip.bounds.top()).max(0);
    let last = view.row_of(clip.bounds.bottom()).min(view.area.height as i64);
    for row in first..last {
        let doc_y = view.scroll + row as f64 * view.metrics.height;
        let k = ((doc_y - texture_top) / view.metrics.height).floor() as i64;
        let glyph = glyphs[k.rem_euclid(glyphs.len() as i64) as usize];
        view.fill_row(buf, row, glyph, style);
    }
}

/// Fixed nav bar on the first row
fn render_nav<C: Clock + Clone>(buf: &mut Buffer, view: &View, app: &App<C>) {
    let Some(nav) = app.page.find(BlockKind::Nav) else {
        return;
    };
    let theme = &app.theme;
    let p = app.surface.presentation(nav.id);
    let bg = blend(theme.surface, theme.background, p.opacity);
    let style = Style::default().fg(theme.foreground).bg(bg);

    view.fill_row(buf, 0, " ", style);
    if let Some(title) = nav.lines.first() {
        view.put(buf, 2, 0, title, style.add_modifier(Modifier::BOLD));
    }
    let link = content::HERO_LINK.to_uppercase();
    let col = view.area.width as i64 - link.chars().count() as i64 - 2;
    if col > 2 {
        view.put(buf, col, 0, &link, style.fg(theme.muted));
    }
}

fn render_loading_bar<C: Clock + Clone>(buf: &mut Buffer, view: &View, app: &App<C>) {
    let now = app.clock().now();
    if app.loading.is_removed(now) {
        return;
    }
    let opacity = app.loading.opacity(now);
    let width = (app.loading.width() * view.area.width as f64).round() as usize;
    if width == 0 {
        return;
    }
    let bar: String = "━".repeat(width);
    let style = Style::default().fg(blend(app.theme.accent, app.theme.surface, opacity));
    view.put(buf, 0, 0, &bar, style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_divider_grows_from_centre() {
        let rule = "────────";
        assert_eq!(scaled(rule, 1.0), (0, rule.to_string()));
        assert_eq!(scaled(rule, 0.0), (4, String::new()));
        assert_eq!(scaled(rule, 0.5), (2, "────".to_string()));
        // Partial cells round up so the rule appears as soon as it starts
        assert_eq!(scaled(rule, 0.01), (3, "─".to_string()));
    }
}
