//! Rectangular footprint collision checking

use nalgebra::{Rotation2, Vector2};

use crate::common::{Obstacles, Point2D, Pose2D};
use crate::config::FootprintConfig;

/// Padded robot rectangle, centred on the robot origin and aligned with its heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub half_length: f64,
    pub half_width: f64,
}

impl Footprint {
    pub fn new(length: f64, width: f64, padding: f64) -> Self {
        Self {
            half_length: length / 2.0 + padding,
            half_width: width / 2.0 + padding,
        }
    }

    pub fn from_config(config: &FootprintConfig) -> Self {
        Self::new(config.length, config.width, config.padding)
    }

    /// Bounds are inclusive: a point on the edge is a hit
    pub fn contains_local(&self, local: &Vector2<f64>) -> bool {
        local.x.abs() <= self.half_length && local.y.abs() <= self.half_width
    }

    /// Whether `point` falls inside the footprint placed at `pose`
    pub fn covers(&self, pose: &Pose2D, point: &Point2D) -> bool {
        self.contains_local(&pose.to_local(point).to_vector())
    }

    /// Sweep the footprint along `poses`; stops at the first hit.
    pub fn is_collision_free(&self, poses: &[Pose2D], obstacles: &Obstacles) -> bool {
        self.sweep(poses, obstacles).is_some()
    }

    /// Collision test and clearance in one pass over every (pose, obstacle) pair.
    ///
    /// Returns `None` at the first obstacle inside the footprint, otherwise the
    /// smallest pose-to-obstacle distance (infinite when either side is empty).
    pub fn sweep(&self, poses: &[Pose2D], obstacles: &Obstacles) -> Option<f64> {
        let mut min_sq = f64::INFINITY;
        if obstacles.is_empty() {
            return Some(min_sq);
        }
        for pose in poses {
            let to_local = Rotation2::new(-pose.yaw);
            let origin = Vector2::new(pose.x, pose.y);
            for o in obstacles.iter() {
                let delta = o.to_vector() - origin;
                if self.contains_local(&(to_local * delta)) {
                    return None;
                }
                min_sq = min_sq.min(delta.norm_squared());
            }
        }
        Some(min_sq.sqrt())
    }

    /// Farthest a footprint corner reaches from the pose origin
    pub fn circumradius(&self) -> f64 {
        self.half_length.hypot(self.half_width)
    }
}
