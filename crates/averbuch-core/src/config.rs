use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::motion::easing::EasingCurve;
use crate::motion::geometry::RootMargin;
use crate::motion::reveal::RevealOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub follower: FollowerConfig,
    #[serde(default)]
    pub forms: FormsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (logs)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Collapse every transition to zero duration
    #[serde(default)]
    pub reduced_motion: bool,
    /// Display refresh rate the engine ticks at
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Default reveal-on-scroll behaviour
    #[serde(default)]
    pub reveal: RevealConfig,
    /// Curve applied within parallax keyframe segments
    #[serde(default = "default_parallax_curve")]
    pub parallax_curve: EasingCurve,
    /// Hero drift per scrolled pixel in the lightweight page variant
    #[serde(default = "default_hero_rate")]
    pub hero_rate: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            animation_fps: default_animation_fps(),
            reveal: RevealConfig::default(),
            parallax_curve: default_parallax_curve(),
            hero_rate: default_hero_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Visible fraction required to reveal (0.0-1.0)
    #[serde(default = "default_reveal_threshold")]
    pub threshold: f64,
    /// CSS-style root margin, e.g. "-100px" or "0px 0px -100px 0px"
    #[serde(default = "default_reveal_margin")]
    pub margin: String,
    /// Transition duration in milliseconds
    #[serde(default = "default_reveal_duration")]
    pub duration_ms: u64,
    /// Starting offset below the resting position, in pixels
    #[serde(default = "default_reveal_offset")]
    pub offset: f64,
    #[serde(default = "default_reveal_curve")]
    pub curve: EasingCurve,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_reveal_threshold(),
            margin: default_reveal_margin(),
            duration_ms: default_reveal_duration(),
            offset: default_reveal_offset(),
            curve: default_reveal_curve(),
        }
    }
}

impl RevealConfig {
    /// Reveal options described by this section
    pub fn options(&self) -> crate::Result<RevealOptions> {
        let margin: RootMargin = self.margin.parse()?;
        Ok(RevealOptions::new(self.threshold, margin)
            .offset(self.offset)
            .duration(Duration::from_millis(self.duration_ms))
            .curve(self.curve))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowerConfig {
    /// Show the smoothed pointer follower
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Fraction of the remaining distance covered per frame
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    /// Narrower viewports (in columns) get no follower
    #[serde(default = "default_min_viewport_width")]
    pub min_viewport_width: u16,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            smoothing: default_smoothing(),
            min_viewport_width: default_min_viewport_width(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormsConfig {
    /// Hosted endpoint receiving contact inquiries
    #[serde(default = "default_inquiry_endpoint")]
    pub inquiry_endpoint: String,
    /// Hosted endpoint receiving job applications
    #[serde(default = "default_application_endpoint")]
    pub application_endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            inquiry_endpoint: default_inquiry_endpoint(),
            application_endpoint: default_application_endpoint(),
            request_timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Rows scrolled per line step
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    /// Animate page jumps (anchor links, page up/down)
    #[serde(default = "default_true")]
    pub smooth_scroll: bool,
    /// Page jump animation duration in milliseconds
    #[serde(default = "default_scroll_duration")]
    pub scroll_duration_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            scroll_lines: default_scroll_lines(),
            smooth_scroll: default_true(),
            scroll_duration_ms: default_scroll_duration(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("averbuch")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_animation_fps() -> u32 {
    60
}

fn default_parallax_curve() -> EasingCurve {
    EasingCurve::Smoothstep
}

fn default_hero_rate() -> f64 {
    0.15
}

fn default_reveal_threshold() -> f64 {
    0.1
}

fn default_reveal_margin() -> String {
    "0px 0px -100px 0px".to_string()
}

fn default_reveal_duration() -> u64 {
    800
}

fn default_reveal_offset() -> f64 {
    30.0
}

fn default_reveal_curve() -> EasingCurve {
    EasingCurve::Standard
}

fn default_smoothing() -> f64 {
    0.1
}

fn default_min_viewport_width() -> u16 {
    100
}

fn default_inquiry_endpoint() -> String {
    "https://formspree.io/f/xjgezpdg".to_string()
}

fn default_application_endpoint() -> String {
    "https://formspree.io/f/mlgwvazg".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_tick_rate() -> u64 {
    16
}

fn default_scroll_lines() -> u16 {
    1
}

fn default_scroll_duration() -> u64 {
    400
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        let reveal = &self.motion.reveal;
        if !(0.0..=1.0).contains(&reveal.threshold) {
            return Err(crate::Error::Config(format!(
                "motion.reveal.threshold must be within 0.0-1.0, got {}",
                reveal.threshold
            )));
        }
        reveal
            .margin
            .parse::<RootMargin>()
            .map_err(|e| crate::Error::Config(format!("motion.reveal.margin: {}", e)))?;
        if !(self.follower.smoothing > 0.0 && self.follower.smoothing <= 1.0) {
            return Err(crate::Error::Config(format!(
                "follower.smoothing must be within (0.0, 1.0], got {}",
                self.follower.smoothing
            )));
        }
        for (name, endpoint) in [
            ("forms.inquiry_endpoint", &self.forms.inquiry_endpoint),
            ("forms.application_endpoint", &self.forms.application_endpoint),
        ] {
            url::Url::parse(endpoint).map_err(|e| crate::Error::Config(format!("{}: {}", name, e)))?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/averbuch/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("averbuch")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used while the terminal preview owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("averbuch.log")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.forms.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.motion.reveal.threshold, 0.1);
        assert_eq!(config.motion.reveal.margin, "0px 0px -100px 0px");
        assert_eq!(config.motion.reveal.curve, EasingCurve::Standard);
        assert_eq!(config.motion.parallax_curve, EasingCurve::Smoothstep);
        assert_eq!(config.follower.smoothing, 0.1);
        assert!(config.forms.inquiry_endpoint.starts_with("https://"));
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = AppConfig::parse(
            r#"
            [motion]
            reduced_motion = true

            [motion.reveal]
            margin = "0px 0px -100px 0px"
            curve = "ease_out"

            [follower]
            enabled = false
            "#,
        )
        .unwrap();
        assert!(config.motion.reduced_motion);
        assert_eq!(config.motion.animation_fps, 60);
        assert_eq!(config.motion.reveal.duration_ms, 800);
        assert_eq!(config.motion.reveal.curve, EasingCurve::EaseOut);
        assert!(!config.follower.enabled);
        assert_eq!(config.ui.tick_rate_ms, 16);
    }

    #[test]
    fn test_reveal_options_from_config() {
        let options = RevealConfig::default().options().unwrap();
        assert_eq!(options.threshold, 0.1);
        assert_eq!(options.margin, RootMargin::new(0.0, 0.0, -100.0, 0.0));
        assert_eq!(options.transition.duration, Duration::from_millis(800));
        assert_eq!(options.transition.curve, EasingCurve::Standard);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AppConfig::parse("[motion.reveal]\nthreshold = 1.5").is_err());
        assert!(AppConfig::parse("[motion.reveal]\nmargin = \"lots\"").is_err());
        assert!(AppConfig::parse("[follower]\nsmoothing = 0.0").is_err());
        assert!(AppConfig::parse("[forms]\ninquiry_endpoint = \"not a url\"").is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("averbuch-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut config = AppConfig::default();
        config.motion.hero_rate = 0.2;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.motion.hero_rate, 0.2);
        std::fs::remove_dir_all(&dir).ok();
    }
}
