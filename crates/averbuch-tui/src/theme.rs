use ratatui::style::Color;

/// Runtime theme for the page preview
#[derive(Debug, Clone)]
pub struct Theme {
    // Page
    pub background: Color,
    pub surface: Color,
    pub border: Color,

    // Text
    pub foreground: Color,
    pub muted: Color,
    pub label: Color,

    // Imagery
    pub image_light: Color,
    pub image_dark: Color,

    // Chrome
    pub accent: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub error: Color,
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Near-black page with warm off-white type
        Self {
            background: Color::Rgb(0x0a, 0x0a, 0x0a),
            surface: Color::Rgb(0x14, 0x14, 0x14),
            border: Color::Rgb(0x2a, 0x2a, 0x2a),
            foreground: Color::Rgb(0xf5, 0xf2, 0xeb),
            muted: Color::Rgb(0x9a, 0x96, 0x8e),
            label: Color::Rgb(0x6e, 0x6a, 0x64),
            image_light: Color::Rgb(0x8c, 0x86, 0x7c),
            image_dark: Color::Rgb(0x3a, 0x37, 0x33),
            accent: Color::Rgb(0xc9, 0xb8, 0x96),
            status_bg: Color::Rgb(0x1c, 0x1c, 0x1c),
            status_fg: Color::Rgb(0xd4, 0xd0, 0xc8),
            error: Color::Rgb(0xea, 0x69, 0x62),
            success: Color::Rgb(0xa9, 0xb6, 0x65),
        }
    }
}

impl Theme {
    /// `color` drawn at `opacity` over the page background
    pub fn fade(&self, color: Color, opacity: f64) -> Color {
        blend(color, self.background, opacity)
    }
}

/// Mix `fg` over `bg`; non-RGB colours snap to whichever side dominates
pub fn blend(fg: Color, bg: Color, opacity: f64) -> Color {
    let t = opacity.clamp(0.0, 1.0);
    match (fg, bg) {
        (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => {
            let mix = |a: u8, b: u8| (b as f64 + (a as f64 - b as f64) * t).round() as u8;
            Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
        }
        _ if t >= 0.5 => fg,
        _ => bg,
    }
}
