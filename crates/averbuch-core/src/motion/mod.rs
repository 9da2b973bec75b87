//! Scroll-linked motion engine
//!
//! Turns scroll offsets, viewport intersections and pointer movement into
//! presentation styles (opacity, offsets) that a host surface applies.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing curves (smoothstep, cubic, cubic-bezier)
//! - `timing` - Clocks, progress and interpolation helpers
//! - `geometry` - Points, rectangles and root margins
//! - `progress` - Scroll ranges and intersection ratios
//! - `mapping` - Keyframe mappings with units
//! - `style` - Partial styles and transitions
//! - `surface` - Host boundary trait and the in-memory surface
//! - `preferences` - Reduced-motion preference, resolved once
//!
//! ## L3 Molecular Layer
//! - `binding` - Scroll-driven property bindings
//! - `reveal` - One-shot reveal on visibility
//! - `follower` - Smoothed pointer follower
//! - `frame` - Coalescing frame scheduler and clock-driven ticker
//! - `transition` - Time-sampled style transitions for hosts
//!
//! ## L2 Organism Layer
//! - `engine` - Event routing, registration handles and teardown
//!
//! # Usage
//!
//! ```ignore
//! use averbuch_core::motion::*;
//!
//! let mut engine = MotionEngine::new(SystemClock::new(), prefs, EngineOptions::default());
//! engine.bind(
//!     PropertyBinding::new(image, ScrollSource::new(ScrollRange::traversal()))
//!         .translate_y(Mapping::measures(&[0.0, 1.0], &["-25%", "25%"])?),
//! );
//!
//! // Host loop
//! engine.handle(MotionEvent::Scroll { offset }, &mut surface);
//! engine.tick(&mut surface);
//! ```

// L4 Atomic Layer
pub mod easing;
pub mod geometry;
pub mod mapping;
pub mod preferences;
pub mod progress;
pub mod style;
pub mod surface;
pub mod timing;

// L3 Molecular Layer
pub mod binding;
pub mod follower;
pub mod frame;
pub mod reveal;
pub mod transition;

// L2 Organism Layer
pub mod engine;

pub use binding::{BindingId, BindingSet, BindingUpdate, PropertyBinding};
pub use easing::EasingCurve;
pub use engine::{EngineOptions, FrameReport, MotionEngine, MotionEvent, Registration, Viewport};
pub use follower::{PointerFollower, SmoothedPosition};
pub use frame::{FrameScheduler, FrameTicker};
pub use geometry::{Point, Rect, RootMargin};
pub use mapping::{Keyframe, Keyframes, Mapping, Measure, Unit};
pub use preferences::MotionPreferences;
pub use progress::{Anchor, Edge, IntersectionSource, ScrollRange, ScrollSource};
pub use reveal::{RevealId, RevealObserver, RevealOptions, VisibilityState};
pub use style::{Style, Transition};
pub use surface::{ElementId, MemorySurface, Surface};
pub use timing::{Clock, ManualClock, SystemClock};
pub use transition::StyleTransition;
