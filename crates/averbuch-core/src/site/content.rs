//! Site copy
//!
//! Static text for the index, applications and legal pages.

use chrono::{Datelike, Utc};

pub const SITE_NAME: &str = "Averbuch Foundation";

pub const HERO_HEADLINE: &str = "Engineering Digital Infrastructure for Modern Brands.";
pub const HERO_SUBTEXT: &str = "We design and develop high performance websites built for scale.";
pub const HERO_LINK: &str = "Inquire";

pub const CAPABILITIES_LABEL: &str = "Core Capabilities";
pub const PHILOSOPHY_LABEL: &str = "Foundation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub title: &'static str,
    pub description: &'static str,
}

pub const CAPABILITIES: [Capability; 4] = [
    Capability {
        title: "Website Architecture",
        description: "Structural digital frameworks engineered for longevity, performance, and seamless scalability.",
    },
    Capability {
        title: "Brand Systems",
        description: "Cohesive identity systems that unify every touchpoint with precision and strategic clarity.",
    },
    Capability {
        title: "eCommerce Development",
        description: "Transaction platforms built for conversion integrity, operational efficiency, and sustained growth.",
    },
    Capability {
        title: "Performance Optimization",
        description: "Systematic refinement of speed, accessibility, and technical infrastructure at every layer.",
    },
];

pub const STATEMENTS: [&str; 3] = [
    "We believe digital infrastructure should be invisible yet powerful, built for decades not trends.",
    "Our vision is to become the go-to foundation for brands that refuse to compromise on quality.",
    "We architect digital experiences that compound in value over time through precision engineering.",
];

/// Parallax imagery between sections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxImage {
    pub alt: &'static str,
    /// Height as a fraction of the viewport height
    pub height_vh: f64,
    /// Opacity of the background-coloured overlay
    pub overlay_opacity: f64,
}

pub const PARALLAX_MID: ParallaxImage = ParallaxImage {
    alt: "Abstract geometric forms",
    height_vh: 0.5,
    overlay_opacity: 0.45,
};

pub const PARALLAX_BOTTOM: ParallaxImage = ParallaxImage {
    alt: "Abstract marble texture",
    height_vh: 0.4,
    overlay_opacity: 0.5,
};

pub const INQUIRY_ANCHOR: &str = "inquire";
pub const INQUIRY_TITLE: &str = "Inquire";
pub const INQUIRY_INTRO: &str = "Let's discuss how we can help bring your vision to life.";

pub const APPLICATION_TITLE: &str = "Join Our Team";
pub const APPLICATION_INTRO: &str =
    "We're always looking for talented individuals to join our team. Submit your application below.";

pub const FOOTER_SIGNATURE: &str = "Built to Last. Designed to Lead.";
pub const FOOTER_LINKS: [&str; 4] = ["Studio", "Inquire", "Applications", "Legal"];
pub const CONTACT_PHONE: &str = "+1 (669) - 639 - 0988";
pub const CONTACT_EMAIL: &str = "eldarowfn@gmail.com";

/// `© <year> Averbuch Foundation. All rights reserved.`
pub fn copyright(year: i32) -> String {
    format!("© {} {}. All rights reserved.", year, SITE_NAME)
}

/// Copyright line for the current year
pub fn copyright_now() -> String {
    copyright(Utc::now().year())
}

/// One titled section of the legal notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalSection {
    pub heading: Option<&'static str>,
    pub body: &'static str,
}

pub const LEGAL_TITLE: &str = "Legal Notice / Disclaimer";
pub const LEGAL_ENTITY: [&str; 3] = [
    SITE_NAME,
    "Sole Proprietorship",
    "Los Gatos, California, United States",
];

pub const LEGAL_SECTIONS: [LegalSection; 4] = [
    LegalSection {
        heading: None,
        body: "All content on this website, including text, graphics, logos, images, and designs, is the property of Averbuch Foundation unless otherwise noted and is protected under U.S. copyright law. Unauthorized use, reproduction, or distribution of any content is prohibited.",
    },
    LegalSection {
        heading: Some("Services Disclaimer"),
        body: "The services provided by Averbuch Foundation are web design and development. While we strive to deliver high-quality work, Averbuch Foundation is not liable for any indirect, incidental, or consequential damages arising from the use of our services or websites we create. Clients are responsible for providing accurate content and ensuring compliance with applicable laws on their own websites.",
    },
    LegalSection {
        heading: Some("Third-Party Content"),
        body: "This website may contain links to third-party websites or resources. Averbuch Foundation is not responsible for the content, privacy policies, or practices of third-party websites.",
    },
    LegalSection {
        heading: Some("Governing Law"),
        body: "This website and all services offered are governed by the laws of the State of California, United States. Any disputes arising from this site or our services shall be subject to the exclusive jurisdiction of the courts located in Santa Clara County, California.",
    },
];

/// Greedy word wrap on character counts.
///
/// Words longer than `width` are split. Always returns at least one line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Plain-text rendering of the legal notice
pub fn legal_text(width: usize) -> String {
    let mut out = Vec::new();
    out.push(LEGAL_TITLE.to_string());
    out.push(String::new());
    out.extend(LEGAL_ENTITY.iter().map(|line| line.to_string()));
    for section in LEGAL_SECTIONS {
        out.push(String::new());
        if let Some(heading) = section.heading {
            out.push(heading.to_string());
            out.push("-".repeat(heading.chars().count()));
        }
        out.extend(wrap(section.body, width));
    }
    out.push(String::new());
    out.push(copyright_now());
    out.join("\n")
}
