//! Index page layout
//!
//! Lays the page out as a column of blocks in document space (pixels, `y`
//! growing downward). Hosts with a character grid pass their cell size in
//! [`CellMetrics`] so text wraps to whole columns and every block starts on a
//! row boundary.

use super::content::{
    self, wrap, CAPABILITIES, CAPABILITIES_LABEL, CONTACT_EMAIL, CONTACT_PHONE, FOOTER_LINKS,
    FOOTER_SIGNATURE, HERO_HEADLINE, HERO_LINK, HERO_SUBTEXT, INQUIRY_INTRO, INQUIRY_TITLE,
    PARALLAX_BOTTOM, PARALLAX_MID, PHILOSOPHY_LABEL, STATEMENTS,
};
use crate::motion::geometry::{Point, Rect};
use crate::motion::surface::ElementId;

/// Scroll offset after which the nav backdrop darkens
pub const NAV_DARKEN_AFTER: f64 = 50.0;

/// Short rule drawn under the hero mark and the inquiry title
const DIVIDER: &str = "────────";

/// Size of one character cell in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width: f64,
    pub height: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 16.0,
        }
    }
}

/// What a block is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Fixed navigation bar
    Nav,
    /// Invisible marker the nav backdrop measures against
    NavMarker,
    /// Fixed pointer follower
    Cursor,
    Hero,
    HeroBackground,
    /// Wraps the hero text; fades and lifts as the hero scrolls away
    HeroContent,
    HeroLogo,
    HeroDivider,
    HeroHeadline,
    HeroSubtext,
    HeroLink,
    /// Scroll hint at the foot of the hero
    HeroIndicator,
    CapabilitiesSection,
    CapabilitiesLabel,
    Capability(usize),
    ParallaxFrame(usize),
    ParallaxImage(usize),
    ParallaxOverlay(usize),
    PhilosophySection,
    PhilosophyLabel,
    /// Wraps one statement; its children reveal when it comes into view
    Statement(usize),
    /// Separator dot above every statement but the first
    StatementDot(usize),
    StatementText(usize),
    InquirySection,
    InquiryPanel,
    InquiryTitle,
    InquiryDivider,
    InquiryIntro,
    InquiryForm,
    /// Row above the button where the submit outcome is announced
    InquiryStatus,
    InquiryButton,
    Footer,
    FooterLinks,
    FooterContact,
}

impl BlockKind {
    /// Elements the pointer follower switches to its hover style over
    pub fn is_interactive(&self) -> bool {
        matches!(self, BlockKind::HeroLink | BlockKind::InquiryButton | BlockKind::FooterLinks)
    }

    /// Viewport-relative rather than document-relative
    pub fn is_fixed(&self) -> bool {
        matches!(self, BlockKind::Nav | BlockKind::Cursor)
    }
}

/// One laid-out element
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: ElementId,
    pub kind: BlockKind,
    /// Enclosing block whose style also applies to this one
    pub parent: Option<ElementId>,
    pub bounds: Rect,
    /// Pre-wrapped text, one entry per row
    pub lines: Vec<String>,
}

/// Laid-out index page
#[derive(Debug, Clone)]
pub struct Page {
    blocks: Vec<Block>,
    width: f64,
    viewport_height: f64,
    height: f64,
    metrics: CellMetrics,
}

struct Builder {
    blocks: Vec<Block>,
    width: f64,
    metrics: CellMetrics,
    cursor_y: f64,
}

impl Builder {
    fn push(&mut self, kind: BlockKind, parent: Option<ElementId>, bounds: Rect, lines: Vec<String>) -> ElementId {
        let id = ElementId(self.blocks.len() as u32 + 1);
        self.blocks.push(Block {
            id,
            kind,
            parent,
            bounds,
            lines,
        });
        id
    }

    fn rows(&self, n: usize) -> f64 {
        n as f64 * self.metrics.height
    }

    fn columns(&self) -> usize {
        ((self.width / self.metrics.width).floor() as usize).max(1)
    }

    /// Text column width: the page width minus side padding, at most 72 columns
    fn text_columns(&self) -> usize {
        self.columns().saturating_sub(8).clamp(1, 72)
    }

    /// Flow a text block at the current position
    fn text(&mut self, kind: BlockKind, parent: Option<ElementId>, lines: Vec<String>) -> ElementId {
        let height = self.rows(lines.len());
        let bounds = Rect::new(0.0, self.cursor_y, self.width, height);
        self.cursor_y += height;
        self.push(kind, parent, bounds, lines)
    }

    fn gap(&mut self, rows: usize) {
        self.cursor_y += self.rows(rows);
    }

    /// Round up to a whole row
    fn snap(&self, px: f64) -> f64 {
        (px / self.metrics.height).ceil() * self.metrics.height
    }

    /// Fix up a section container to span from `top` to the cursor
    fn close(&mut self, id: ElementId, top: f64) {
        let height = self.cursor_y - top;
        if let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) {
            block.bounds.height = height;
        }
    }
}

impl Page {
    /// Lay out the index page for a viewport of `width` × `viewport_height` pixels
    pub fn layout(width: f64, viewport_height: f64, metrics: CellMetrics) -> Page {
        let mut b = Builder {
            blocks: Vec::new(),
            width,
            metrics,
            cursor_y: 0.0,
        };
        let columns = b.text_columns();
        let vh = b.snap(viewport_height);

        b.push(BlockKind::Nav, None, Rect::new(0.0, 0.0, width, metrics.height), vec![content::SITE_NAME.to_uppercase()]);
        b.push(BlockKind::NavMarker, None, Rect::new(0.0, NAV_DARKEN_AFTER, width, 1.0), Vec::new());
        b.push(BlockKind::Cursor, None, Rect::new(0.0, 0.0, metrics.width, metrics.height), Vec::new());

        // Hero: one viewport tall, content centred, background overscanned by 10%
        let hero = b.push(BlockKind::Hero, None, Rect::new(0.0, 0.0, width, vh), Vec::new());
        b.push(
            BlockKind::HeroBackground,
            Some(hero),
            Rect::new(0.0, -0.1 * vh, width, 1.2 * vh),
            Vec::new(),
        );
        let headline = wrap(HERO_HEADLINE, columns);
        let subtext = wrap(HERO_SUBTEXT, columns);
        // logo, gap, divider, gap, headline, gap, subtext, two gaps, link
        let content_rows = 1 + 1 + 1 + 1 + headline.len() + 1 + subtext.len() + 2 + 1;
        let content_height = b.rows(content_rows);
        let content_top = b.snap(((vh - content_height) / 2.0).max(0.0));
        let content = b.push(
            BlockKind::HeroContent,
            Some(hero),
            Rect::new(0.0, content_top, width, content_height),
            Vec::new(),
        );
        b.cursor_y = content_top;
        b.text(BlockKind::HeroLogo, Some(content), vec![content::SITE_NAME.to_uppercase()]);
        b.gap(1);
        b.text(BlockKind::HeroDivider, Some(content), vec![DIVIDER.to_string()]);
        b.gap(1);
        b.text(BlockKind::HeroHeadline, Some(content), headline);
        b.gap(1);
        b.text(BlockKind::HeroSubtext, Some(content), subtext);
        b.gap(2);
        b.text(BlockKind::HeroLink, Some(content), vec![HERO_LINK.to_uppercase()]);
        let indicator_top = (vh - b.rows(2)).max(b.cursor_y);
        b.push(
            BlockKind::HeroIndicator,
            Some(hero),
            Rect::new(0.0, indicator_top, width, metrics.height),
            vec!["│".to_string()],
        );
        b.cursor_y = vh;

        // Capabilities
        let top = b.cursor_y;
        let section = b.push(BlockKind::CapabilitiesSection, None, Rect::new(0.0, top, width, 0.0), Vec::new());
        b.gap(3);
        b.text(BlockKind::CapabilitiesLabel, Some(section), vec![CAPABILITIES_LABEL.to_uppercase()]);
        b.gap(2);
        for (i, capability) in CAPABILITIES.iter().enumerate() {
            let mut lines = vec![capability.title.to_string()];
            lines.extend(wrap(capability.description, columns.min(56)));
            b.text(BlockKind::Capability(i), Some(section), lines);
            b.gap(2);
        }
        b.gap(1);
        b.close(section, top);

        b.parallax(0, PARALLAX_MID.height_vh * vh);

        // Philosophy
        let top = b.cursor_y;
        let section = b.push(BlockKind::PhilosophySection, None, Rect::new(0.0, top, width, 0.0), Vec::new());
        b.gap(3);
        b.text(BlockKind::PhilosophyLabel, Some(section), vec![PHILOSOPHY_LABEL.to_uppercase()]);
        b.gap(2);
        for (i, statement) in STATEMENTS.iter().enumerate() {
            let statement_top = b.cursor_y;
            let wrapper = b.push(
                BlockKind::Statement(i),
                Some(section),
                Rect::new(0.0, statement_top, width, 0.0),
                Vec::new(),
            );
            if i > 0 {
                b.text(BlockKind::StatementDot(i), Some(wrapper), vec!["·".to_string()]);
                b.gap(1);
            }
            b.text(BlockKind::StatementText(i), Some(wrapper), wrap(statement, columns.min(64)));
            b.close(wrapper, statement_top);
            b.gap(2);
        }
        b.gap(1);
        b.close(section, top);

        b.parallax(1, PARALLAX_BOTTOM.height_vh * vh);

        // Inquiry
        let top = b.cursor_y;
        let section = b.push(BlockKind::InquirySection, None, Rect::new(0.0, top, width, 0.0), Vec::new());
        b.gap(3);
        let panel_top = b.cursor_y;
        let panel = b.push(BlockKind::InquiryPanel, Some(section), Rect::new(0.0, panel_top, width, 0.0), Vec::new());
        b.text(BlockKind::InquiryTitle, Some(panel), vec![INQUIRY_TITLE.to_string()]);
        b.gap(1);
        b.text(BlockKind::InquiryDivider, Some(panel), vec![DIVIDER.to_string()]);
        b.gap(1);
        b.text(BlockKind::InquiryIntro, Some(panel), wrap(INQUIRY_INTRO, columns));
        b.gap(1);
        let form_top = b.cursor_y;
        let form = b.text(BlockKind::InquiryForm, Some(panel), vec![
            "Name · Email · Company (optional) · Message".to_string(),
        ]);
        b.gap(1);
        let status_top = b.cursor_y;
        b.push(
            BlockKind::InquiryStatus,
            Some(form),
            Rect::new(0.0, status_top, width, metrics.height),
            Vec::new(),
        );
        b.gap(1);
        b.text(BlockKind::InquiryButton, Some(form), vec!["[ SEND INQUIRY ]".to_string()]);
        b.close(form, form_top);
        b.close(panel, panel_top);
        b.gap(3);
        b.close(section, top);

        // Footer
        let top = b.cursor_y;
        let footer = b.push(BlockKind::Footer, None, Rect::new(0.0, top, width, 0.0), Vec::new());
        b.gap(2);
        b.text(BlockKind::FooterLinks, Some(footer), vec![
            FOOTER_SIGNATURE.to_string(),
            String::new(),
            FOOTER_LINKS.join("   ").to_uppercase(),
        ]);
        b.gap(1);
        b.text(BlockKind::FooterContact, Some(footer), vec![
            format!("{}  •  {}", CONTACT_PHONE, CONTACT_EMAIL),
            String::new(),
            content::copyright_now(),
        ]);
        b.gap(2);
        b.close(footer, top);

        let height = b.cursor_y;
        Page {
            blocks: b.blocks,
            width,
            viewport_height: vh,
            height,
            metrics,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: ElementId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn find(&self, kind: BlockKind) -> Option<&Block> {
        self.blocks.iter().find(|b| b.kind == kind)
    }

    pub fn id_of(&self, kind: BlockKind) -> Option<ElementId> {
        self.find(kind).map(|b| b.id)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Total document height
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn max_scroll(&self) -> f64 {
        (self.height - self.viewport_height).max(0.0)
    }

    /// Scroll offset for an in-page link, keeping the target clear of the nav.
    ///
    /// `""`, `"#"` and `"top"` scroll to the top.
    pub fn anchor_offset(&self, anchor: &str) -> Option<f64> {
        let anchor = anchor.trim_start_matches('#');
        let top = match anchor {
            "" | "top" => return Some(0.0),
            content::INQUIRY_ANCHOR => self.find(BlockKind::InquirySection)?.bounds.top(),
            _ => return None,
        };
        let nav = self.find(BlockKind::Nav).map(|b| b.bounds.height).unwrap_or(0.0);
        Some((top - nav).clamp(0.0, self.max_scroll()))
    }

    /// Interactive element under a document-space point
    pub fn interactive_at(&self, point: Point) -> Option<ElementId> {
        self.blocks
            .iter()
            .filter(|b| b.kind.is_interactive())
            .find(|b| b.bounds.contains(point))
            .map(|b| b.id)
    }

    /// Chain of ancestors, nearest first
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = &Block> + '_ {
        let mut next = self.block(id).and_then(|b| b.parent);
        std::iter::from_fn(move || {
            let block = self.block(next?)?;
            next = block.parent;
            Some(block)
        })
    }
}

impl Builder {
    /// Parallax frame with an overscanned image and an overlay
    fn parallax(&mut self, index: usize, height: f64) {
        let height = self.snap(height);
        let top = self.cursor_y;
        let frame = self.push(
            BlockKind::ParallaxFrame(index),
            None,
            Rect::new(0.0, top, self.width, height),
            Vec::new(),
        );
        self.push(
            BlockKind::ParallaxImage(index),
            Some(frame),
            Rect::new(0.0, top - 0.2 * height, self.width, 1.4 * height),
            Vec::new(),
        );
        self.push(
            BlockKind::ParallaxOverlay(index),
            Some(frame),
            Rect::new(0.0, top, self.width, height),
            Vec::new(),
        );
        self.cursor_y += height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        Page::layout(960.0, 640.0, CellMetrics::default())
    }

    #[test]
    fn test_sections_in_order() {
        let page = page();
        let order: Vec<f64> = [
            BlockKind::Hero,
            BlockKind::CapabilitiesSection,
            BlockKind::ParallaxFrame(0),
            BlockKind::PhilosophySection,
            BlockKind::ParallaxFrame(1),
            BlockKind::InquirySection,
            BlockKind::Footer,
        ]
        .iter()
        .map(|kind| page.find(*kind).unwrap().bounds.top())
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{:?}", order);
        assert_eq!(page.find(BlockKind::Hero).unwrap().bounds.height, 640.0);
        assert_eq!(page.find(BlockKind::ParallaxFrame(0)).unwrap().bounds.height, 320.0);
    }

    #[test]
    fn test_ids_are_unique_and_resolvable() {
        let page = page();
        for block in page.blocks() {
            assert_eq!(page.block(block.id).unwrap().kind, block.kind);
            if let Some(parent) = block.parent {
                assert!(page.block(parent).is_some());
            }
        }
    }

    #[test]
    fn test_inquire_anchor_clears_nav() {
        let page = page();
        let section = page.find(BlockKind::InquirySection).unwrap().bounds.top();
        let offset = page.anchor_offset("#inquire").unwrap();
        assert_eq!(offset, (section - 16.0).min(page.max_scroll()));
        assert_eq!(page.anchor_offset("#"), Some(0.0));
        assert_eq!(page.anchor_offset("#missing"), None);
    }

    #[test]
    fn test_text_wraps_to_columns() {
        let page = Page::layout(320.0, 480.0, CellMetrics::default());
        let columns = (320.0 / 8.0) as usize - 8;
        let wrapped = page
            .blocks()
            .iter()
            .filter(|b| {
                matches!(
                    b.kind,
                    BlockKind::HeroHeadline | BlockKind::HeroSubtext | BlockKind::Capability(_) | BlockKind::StatementText(_)
                )
            });
        for block in wrapped {
            for line in &block.lines {
                assert!(line.chars().count() <= columns, "{:?}", line);
            }
        }
    }

    #[test]
    fn test_hero_link_is_interactive() {
        let page = page();
        let link = page.find(BlockKind::HeroLink).unwrap();
        let inside = Point::new(10.0, link.bounds.top() + 1.0);
        assert_eq!(page.interactive_at(inside), Some(link.id));
        assert_eq!(page.interactive_at(Point::new(10.0, 1.0)), None);

        let ancestors: Vec<BlockKind> = page.ancestors(link.id).map(|b| b.kind).collect();
        assert_eq!(ancestors, vec![BlockKind::HeroContent, BlockKind::Hero]);
    }

    #[test]
    fn test_containers_span_their_children() {
        let page = page();
        for container in [
            BlockKind::HeroContent,
            BlockKind::InquiryPanel,
            BlockKind::InquiryForm,
            BlockKind::Statement(1),
        ] {
            let outer = page.find(container).unwrap();
            assert!(outer.lines.is_empty(), "{:?} carries text", container);
            let children: Vec<&Block> = page.blocks().iter().filter(|b| b.parent == Some(outer.id)).collect();
            assert!(!children.is_empty(), "{:?} has no children", container);
            for child in children {
                assert!(child.bounds.top() >= outer.bounds.top(), "{:?} above {:?}", child.kind, container);
                assert!(child.bounds.bottom() <= outer.bounds.bottom(), "{:?} below {:?}", child.kind, container);
            }
        }
        assert!(page.find(BlockKind::StatementDot(0)).is_none());
        assert!(page.find(BlockKind::StatementDot(1)).is_some());
    }

    #[test]
    fn test_inquiry_status_sits_above_button() {
        let page = page();
        let status = page.find(BlockKind::InquiryStatus).unwrap();
        let button = page.find(BlockKind::InquiryButton).unwrap();
        assert_eq!(status.bounds.height, 16.0);
        assert!(status.bounds.bottom() < button.bounds.top());
        assert_eq!(button.parent, page.id_of(BlockKind::InquiryForm));
        let ancestors: Vec<BlockKind> = page.ancestors(button.id).map(|b| b.kind).collect();
        assert_eq!(
            ancestors,
            vec![BlockKind::InquiryForm, BlockKind::InquiryPanel, BlockKind::InquirySection]
        );
    }
}
