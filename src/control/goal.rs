//! Goal state for one planning episode

use crate::common::Point2D;

/// Active target point and whether it has been reached.
///
/// A new goal means a new `GoalState`; the only mutation is the one-way
/// reached transition.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalState {
    target: Point2D,
    reached: bool,
    transitions: u32,
}

impl GoalState {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            target: Point2D::new(x, y),
            reached: false,
            transitions: 0,
        }
    }

    pub fn target(&self) -> Point2D {
        self.target
    }

    pub fn is_reached(&self) -> bool {
        self.reached
    }

    /// Flag the goal as reached. Returns true only on the first call.
    pub fn mark_reached(&mut self) -> bool {
        if self.reached {
            return false;
        }
        self.reached = true;
        self.transitions += 1;
        log::info!("Goal reached at ({}, {}).", self.target.x, self.target.y);
        true
    }

    /// How many times the reached flag flipped (0 or 1)
    pub fn reached_transitions(&self) -> u32 {
        self.transitions
    }
}
