pub mod config;
pub mod error;
pub mod forms;
pub mod motion;
pub mod site;

pub use config::{AppConfig, FollowerConfig, FormsConfig, MotionConfig, RevealConfig, UiConfig};
pub use error::{Error, Result};
pub use motion::{EasingCurve, MotionPreferences};
