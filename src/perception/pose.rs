//! Pose estimation from odometry samples
//!
//! Odometry arrives as a 3D position plus an orientation quaternion; the
//! planner only needs the planar part and the heading.

use nalgebra::{Quaternion, UnitQuaternion};

use crate::common::{normalize_angle, Pose2D};

/// Orientation quaternion as delivered on the odometry channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Orientation {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub fn identity() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }

    /// Pure rotation about the vertical axis
    pub fn from_yaw(yaw: f64) -> Self {
        let q = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw);
        Self { x: q.i, y: q.j, z: q.k, w: q.w }
    }

    /// Heading extracted through a roll/pitch/yaw decomposition.
    ///
    /// Returns `None` for a quaternion too close to zero to normalize.
    pub fn yaw(&self) -> Option<f64> {
        let q = Quaternion::new(self.w, self.x, self.y, self.z);
        if !(q.norm() > 1e-9) {
            return None;
        }
        let (_, _, yaw) = UnitQuaternion::from_quaternion(q).euler_angles();
        Some(normalize_angle(yaw))
    }
}

/// One odometry sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub orientation: Orientation,
}

impl PoseSample {
    pub fn new(x: f64, y: f64, z: f64, orientation: Orientation) -> Self {
        Self { x, y, z, orientation }
    }

    /// Build a planar sample from a 2D pose
    pub fn from_pose(pose: &Pose2D) -> Self {
        Self {
            x: pose.x,
            y: pose.y,
            z: 0.0,
            orientation: Orientation::from_yaw(pose.yaw),
        }
    }
}

/// Derive the planar pose from the latest odometry sample.
///
/// `None` means no usable sample is available yet.
pub fn estimate_pose(sample: Option<&PoseSample>) -> Option<Pose2D> {
    let sample = sample?;
    match sample.orientation.yaw() {
        Some(yaw) => Some(Pose2D::new(sample.x, sample.y, yaw)),
        None => {
            log::warn!("Discarding odometry sample with degenerate orientation quaternion");
            None
        }
    }
}
