//! Candidate trajectory produced by a constant-command rollout

use crate::common::{ControlInput, Path2D, Point2D, Pose2D};

/// A forward-simulated (speed, turn rate) pair.
///
/// `poses` excludes the starting pose. Candidates live for one tick only.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub speed: f64,
    pub turn_rate: f64,
    pub poses: Vec<Pose2D>,
    pub final_yaw: f64,
}

impl Trajectory {
    /// Zero-velocity trajectory holding `yaw`
    pub fn stopped(yaw: f64) -> Self {
        Self {
            speed: 0.0,
            turn_rate: 0.0,
            poses: Vec::new(),
            final_yaw: yaw,
        }
    }

    pub fn control(&self) -> ControlInput {
        ControlInput::new(self.speed, self.turn_rate)
    }

    pub fn terminal(&self) -> Option<&Pose2D> {
        self.poses.last()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Planar points of the rollout, for display
    pub fn to_path(&self) -> Path2D {
        Path2D::from_points(self.poses.iter().map(|p| Point2D::new(p.x, p.y)).collect())
    }
}
