//! L3 Molecular Layer: Smoothed pointer follower
//!
//! Each frame the follower moves a fixed fraction of the remaining distance
//! toward the latest pointer position. Pointer moves only overwrite the
//! target; all motion happens in [`PointerFollower::tick`].

use std::collections::HashSet;

use super::geometry::Point;
use super::surface::ElementId;

/// Default fraction of the remaining distance covered per frame
pub const DEFAULT_SMOOTHING: f64 = 0.1;

/// Current and target position of the follower
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothedPosition {
    pub current_x: f64,
    pub current_y: f64,
    pub target_x: f64,
    pub target_y: f64,
}

impl SmoothedPosition {
    /// One smoothing step; returns the new current position
    #[inline]
    pub fn step(&mut self, smoothing: f64) -> Point {
        self.current_x += (self.target_x - self.current_x) * smoothing;
        self.current_y += (self.target_y - self.current_y) * smoothing;
        self.current()
    }

    #[inline]
    pub fn current(&self) -> Point {
        Point::new(self.current_x, self.current_y)
    }

    #[inline]
    pub fn target(&self) -> Point {
        Point::new(self.target_x, self.target_y)
    }

    /// Distance still to travel
    pub fn remaining(&self) -> f64 {
        self.current().distance(self.target())
    }
}

/// Pointer follower with hover tracking
#[derive(Debug, Clone)]
pub struct PointerFollower {
    position: SmoothedPosition,
    smoothing: f64,
    interactive: HashSet<ElementId>,
    hovering: bool,
    frames: u64,
}

impl Default for PointerFollower {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING)
    }
}

impl PointerFollower {
    /// `smoothing` is clamped to (0, 1]
    pub fn new(smoothing: f64) -> Self {
        let smoothing = if smoothing.is_finite() && smoothing > 0.0 {
            smoothing.min(1.0)
        } else {
            DEFAULT_SMOOTHING
        };
        Self {
            position: SmoothedPosition::default(),
            smoothing,
            interactive: HashSet::new(),
            hovering: false,
            frames: 0,
        }
    }

    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    pub fn position(&self) -> &SmoothedPosition {
        &self.position
    }

    /// Raw pointer move: overwrite the target, nothing else
    #[inline]
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.position.target_x = x;
        self.position.target_y = y;
    }

    /// Per-frame update
    pub fn tick(&mut self) -> Point {
        self.frames += 1;
        self.position.step(self.smoothing)
    }

    /// Frames ticked so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether the follower is within `epsilon` of the target
    pub fn is_settled(&self, epsilon: f64) -> bool {
        self.position.remaining() <= epsilon
    }

    /// Mark an element as one that switches the follower into hover style
    pub fn register_interactive(&mut self, element: ElementId) {
        self.interactive.insert(element);
    }

    pub fn unregister_interactive(&mut self, element: ElementId) {
        self.interactive.remove(&element);
    }

    pub fn pointer_enter(&mut self, element: ElementId) {
        if self.interactive.contains(&element) {
            self.hovering = true;
        }
    }

    pub fn pointer_leave(&mut self, element: ElementId) {
        if self.interactive.contains(&element) {
            self.hovering = false;
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Drop hover registrations and state
    pub fn clear_interactive(&mut self) {
        self.interactive.clear();
        self.hovering = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_step_moves_ten_percent() {
        let mut follower = PointerFollower::default();
        follower.pointer_moved(100.0, -50.0);
        let p = follower.tick();
        assert!((p.x - 10.0).abs() < 1e-12);
        assert!((p.y + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_converges_within_bounded_steps() {
        let mut follower = PointerFollower::default();
        follower.pointer_moved(1.0, 0.0);
        let mut steps = 0;
        while !follower.is_settled(1e-3) {
            follower.tick();
            steps += 1;
            assert!(steps <= 70, "did not converge");
        }
        // 0.9^n < 1e-3  =>  n >= 66
        assert_eq!(steps, 66);
    }

    #[test]
    fn test_target_overwritten_without_moving() {
        let mut follower = PointerFollower::default();
        follower.pointer_moved(10.0, 10.0);
        follower.pointer_moved(20.0, 20.0);
        assert_eq!(follower.position().current(), Point::new(0.0, 0.0));
        assert_eq!(follower.position().target(), Point::new(20.0, 20.0));
        assert_eq!(follower.frames(), 0);
    }

    #[test]
    fn test_hover_only_for_registered_elements() {
        let mut follower = PointerFollower::default();
        let link = ElementId(1);
        let text = ElementId(2);
        follower.register_interactive(link);

        follower.pointer_enter(text);
        assert!(!follower.is_hovering());
        follower.pointer_enter(link);
        assert!(follower.is_hovering());
        follower.pointer_leave(link);
        assert!(!follower.is_hovering());
    }

    #[test]
    fn test_invalid_smoothing_falls_back() {
        assert_eq!(PointerFollower::new(0.0).smoothing(), DEFAULT_SMOOTHING);
        assert_eq!(PointerFollower::new(f64::NAN).smoothing(), DEFAULT_SMOOTHING);
        assert_eq!(PointerFollower::new(3.0).smoothing(), 1.0);
    }

    proptest! {
        #[test]
        fn prop_converges_from_unit_distance(angle in 0.0f64..std::f64::consts::TAU) {
            let mut follower = PointerFollower::default();
            follower.pointer_moved(angle.cos(), angle.sin());
            let mut steps = 0;
            while !follower.is_settled(1e-3) {
                follower.tick();
                steps += 1;
                prop_assert!(steps <= 70, "not settled after {} steps", steps);
            }
        }

        #[test]
        fn prop_each_step_closes_a_fixed_fraction(
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
            smoothing in 0.01f64..=1.0,
        ) {
            let mut follower = PointerFollower::new(smoothing);
            follower.pointer_moved(x, y);
            let before = follower.position().remaining();
            follower.tick();
            let after = follower.position().remaining();
            prop_assert!((after - (1.0 - smoothing) * before).abs() <= 1e-9 * (1.0 + before));
        }
    }
}
