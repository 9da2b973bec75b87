//! The index page: copy, layout and its motion wiring
//!
//! - `content`: site text and the legal notice
//! - `layout`: blocks in document space
//! - `scene`: bindings and reveals for each block
//! - `loading`: the page-load bar

pub mod content;
pub mod layout;
pub mod loading;
pub mod scene;

pub use layout::{Block, BlockKind, CellMetrics, Page, NAV_DARKEN_AFTER};
pub use loading::{LoadingBar, LoadingPhase};
pub use scene::{announce, install, SceneHandles, Variant, STATUS_TRANSITION};
