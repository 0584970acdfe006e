//! Kinematic robot and simulated range sensor

use crate::common::{ControlInput, MotionModel, Pose2D, UnicycleModel};
use crate::perception::{PoseSample, ScanSample};

use super::world::World;

/// Unicycle robot that executes velocity commands exactly
#[derive(Debug, Clone)]
pub struct SimRobot<M: MotionModel = UnicycleModel> {
    pose: Pose2D,
    model: M,
}

impl SimRobot<UnicycleModel> {
    pub fn new(pose: Pose2D) -> Self {
        Self::with_model(pose, UnicycleModel)
    }
}

impl<M: MotionModel> SimRobot<M> {
    pub fn with_model(pose: Pose2D, model: M) -> Self {
        Self { pose, model }
    }

    pub fn pose(&self) -> Pose2D {
        self.pose
    }

    /// Hold `command` for `dt` seconds
    pub fn step(&mut self, command: &ControlInput, dt: f64) {
        self.pose = self.model.propagate(&self.pose, command, dt);
    }

    /// Odometry message for the current pose
    pub fn odometry(&self) -> PoseSample {
        PoseSample::from_pose(&self.pose)
    }
}

/// 2-D lidar mounted at the robot center.
///
/// Beams are spread evenly over a full turn starting at the robot heading.
/// Beams without a hit read `f64::INFINITY`; hits are capped at `range_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimLidar {
    pub num_beams: usize,
    pub range_max: f64,
}

impl Default for SimLidar {
    fn default() -> Self {
        Self {
            num_beams: 360,
            range_max: 10.0,
        }
    }
}

impl SimLidar {
    pub fn new(num_beams: usize, range_max: f64) -> Self {
        Self { num_beams, range_max }
    }

    pub fn angle_increment(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.num_beams.max(1) as f64
    }

    pub fn scan(&self, world: &World, pose: &Pose2D) -> ScanSample {
        let increment = self.angle_increment();
        let origin = pose.position();
        let ranges = (0..self.num_beams)
            .map(|i| {
                let bearing = pose.yaw + i as f64 * increment;
                match world.ray_cast(&origin, bearing) {
                    Some(d) => d.min(self.range_max),
                    None => f64::INFINITY,
                }
            })
            .collect();
        ScanSample::new(ranges, 0.0, increment, self.range_max)
    }
}
